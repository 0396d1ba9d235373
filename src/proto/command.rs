/// Ack the device returns for every register-select opcode.
pub const SELECT_ACK: u8 = 0xBB;

/// Every single-byte command the firing module understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // ---- Status / firing ----
    Ping,
    Fire,
    TriggerFire,
    TriggerTest,
    TriggerCharge,
    MainCapCharge,
    ChargeReset,

    // ---- Register reads (device answers with the value) ----
    ReadTriggerDuration,
    ReadTriggerResistance,
    ReadMainCapResistance,

    // ---- Register select (first half of a write) ----
    SetTriggerDuration,
    SetTriggerResistance,
    SetMainCapResistance,
}

impl Command {
    pub const ALL: [Command; 13] = [
        Command::Ping,
        Command::Fire,
        Command::TriggerFire,
        Command::TriggerTest,
        Command::TriggerCharge,
        Command::MainCapCharge,
        Command::ChargeReset,
        Command::ReadTriggerDuration,
        Command::ReadTriggerResistance,
        Command::ReadMainCapResistance,
        Command::SetTriggerDuration,
        Command::SetTriggerResistance,
        Command::SetMainCapResistance,
    ];

    pub const fn opcode(self) -> u8 {
        match self {
            Command::Ping => 0x80,
            Command::Fire => 0x81,
            Command::TriggerFire => 0x82,
            Command::TriggerTest => 0x83,
            Command::TriggerCharge => 0x84,
            Command::MainCapCharge => 0x85,
            Command::ChargeReset => 0x86,
            Command::ReadTriggerDuration => 0x21,
            Command::ReadTriggerResistance => 0x22,
            Command::ReadMainCapResistance => 0x23,
            Command::SetTriggerDuration => 0x41,
            Command::SetTriggerResistance => 0x42,
            Command::SetMainCapResistance => 0x43,
        }
    }

    /// `None` means the reply byte is a value, not an ack.
    pub const fn expected_ack(self) -> Option<u8> {
        match self {
            Command::Ping => Some(0xA0),
            Command::Fire => Some(0xA1),
            Command::TriggerFire => Some(0xA2),
            Command::TriggerTest => Some(0xA3),
            Command::TriggerCharge => Some(0xA4),
            Command::MainCapCharge => Some(0xA5),
            Command::ChargeReset => Some(0xA6),
            Command::ReadTriggerDuration
            | Command::ReadTriggerResistance
            | Command::ReadMainCapResistance => None,
            Command::SetTriggerDuration
            | Command::SetTriggerResistance
            | Command::SetMainCapResistance => Some(SELECT_ACK),
        }
    }

    /// Commands that touch the charge circuit get a charge reset first.
    pub const fn resets_charge_first(self) -> bool {
        matches!(
            self,
            Command::Fire | Command::TriggerFire | Command::TriggerCharge | Command::MainCapCharge
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Command::Ping => "ping",
            Command::Fire => "fire",
            Command::TriggerFire => "trigger-fire",
            Command::TriggerTest => "trigger-test",
            Command::TriggerCharge => "trigger-charge",
            Command::MainCapCharge => "main-cap-charge",
            Command::ChargeReset => "charge-reset",
            Command::ReadTriggerDuration => "read-trigger-duration",
            Command::ReadTriggerResistance => "read-trigger-resistance",
            Command::ReadMainCapResistance => "read-main-cap-resistance",
            Command::SetTriggerDuration => "set-trigger-duration",
            Command::SetTriggerResistance => "set-trigger-resistance",
            Command::SetMainCapResistance => "set-main-cap-resistance",
        }
    }

    pub fn from_opcode(opcode: u8) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.opcode() == opcode)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Writable device registers. A write is select-opcode, then the value byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    TriggerDuration,
    TriggerResistance,
    MainCapResistance,
}

impl Register {
    pub const fn select(self) -> Command {
        match self {
            Register::TriggerDuration => Command::SetTriggerDuration,
            Register::TriggerResistance => Command::SetTriggerResistance,
            Register::MainCapResistance => Command::SetMainCapResistance,
        }
    }

    /// Ack confirming the value byte was stored.
    pub const fn confirm_ack(self) -> u8 {
        match self {
            Register::TriggerDuration => 0xC1,
            Register::TriggerResistance => 0xC2,
            Register::MainCapResistance => 0xC3,
        }
    }

    pub const fn read(self) -> Command {
        match self {
            Register::TriggerDuration => Command::ReadTriggerDuration,
            Register::TriggerResistance => Command::ReadTriggerResistance,
            Register::MainCapResistance => Command::ReadMainCapResistance,
        }
    }

    pub fn from_select_opcode(opcode: u8) -> Option<Register> {
        [
            Register::TriggerDuration,
            Register::TriggerResistance,
            Register::MainCapResistance,
        ]
        .into_iter()
        .find(|r| r.select().opcode() == opcode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_table_matches_device() {
        let table: Vec<(u8, Option<u8>)> = Command::ALL
            .iter()
            .map(|c| (c.opcode(), c.expected_ack()))
            .collect();
        assert_eq!(
            table,
            vec![
                (0x80, Some(0xA0)),
                (0x81, Some(0xA1)),
                (0x82, Some(0xA2)),
                (0x83, Some(0xA3)),
                (0x84, Some(0xA4)),
                (0x85, Some(0xA5)),
                (0x86, Some(0xA6)),
                (0x21, None),
                (0x22, None),
                (0x23, None),
                (0x41, Some(0xBB)),
                (0x42, Some(0xBB)),
                (0x43, Some(0xBB)),
            ]
        );
    }

    #[test]
    fn opcodes_are_unique() {
        for c in Command::ALL {
            assert_eq!(Command::from_opcode(c.opcode()), Some(c));
        }
        assert_eq!(Command::from_opcode(0x00), None);
    }

    #[test]
    fn only_charge_commands_reset_first() {
        let resetting: Vec<Command> = Command::ALL
            .into_iter()
            .filter(|c| c.resets_charge_first())
            .collect();
        assert_eq!(
            resetting,
            vec![
                Command::Fire,
                Command::TriggerFire,
                Command::TriggerCharge,
                Command::MainCapCharge
            ]
        );
    }

    #[test]
    fn registers() {
        assert_eq!(Register::TriggerDuration.select().opcode(), 0x41);
        assert_eq!(Register::TriggerResistance.confirm_ack(), 0xC2);
        assert_eq!(Register::MainCapResistance.read(), Command::ReadMainCapResistance);
        assert_eq!(
            Register::from_select_opcode(0x43),
            Some(Register::MainCapResistance)
        );
        assert_eq!(Register::from_select_opcode(0x80), None);
    }
}
