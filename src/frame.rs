use std::fmt;

/// Largest read per exchange. One byte is a valid reply, a second one
/// is enough to detect an overrun.
pub const READ_WINDOW: usize = 2;

/// One response window, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Nothing arrived before the read timeout.
    Timeout,
    /// More than the single byte the protocol allows.
    Overrun(Vec<u8>),
    /// Exactly one byte.
    Ack(u8),
}

impl Response {
    pub fn classify(received: &[u8]) -> Self {
        match received {
            [] => Response::Timeout,
            [b] => Response::Ack(*b),
            _ => Response::Overrun(received.to_vec()),
        }
    }
}

/// Formats a byte as `0xNN` for log fields.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Hex(pub u8);

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

impl fmt::Debug for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Formats a byte run as `[0xNN, 0xNN]`.
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", Hex(*b))?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_length() {
        assert_eq!(Response::classify(&[]), Response::Timeout);
        assert_eq!(Response::classify(&[0xA0]), Response::Ack(0xA0));
        assert_eq!(
            Response::classify(&[0xA0, 0xA0]),
            Response::Overrun(vec![0xA0, 0xA0])
        );
        assert_eq!(
            Response::classify(&[1, 2, 3]),
            Response::Overrun(vec![1, 2, 3])
        );
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(Hex(0x0A).to_string(), "0x0A");
        assert_eq!(format!("{:?}", Hex(0xBB)), "0xBB");
        assert_eq!(HexBytes(&[0xA1, 0x02]).to_string(), "[0xA1, 0x02]");
        assert_eq!(HexBytes(&[]).to_string(), "[]");
    }
}
