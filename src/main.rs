use anyhow::{Context, Result};
use clap::Parser;

use thruster_driver::{ProtocolEngine, SerialTransport, app, cli, logging};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logging::init(args.ser.debug);

    let conf = args.ser.port_config();
    let port = SerialTransport::open(&conf).with_context(|| format!("open {}", conf.dev))?;
    let engine = ProtocolEngine::with_config(port, args.ser.engine_config());

    app::run(&engine, args.cmd, &mut std::io::stdout().lock())
}
