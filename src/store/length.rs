//! Length byte encoding
//!
//! The first byte of every slot is either a record length (0..=254) or the
//! terminator sentinel 0xFF. Keeping the distinction in a dedicated type
//! prevents 255 from ever being conflated with a valid length.

/// Terminator sentinel: marks the first address past the last record
pub const TERMINATOR: u8 = 0xFF;

/// Maximum record content length (255 is reserved for the terminator)
pub const MAX_RECORD_LEN: usize = 254;

/// Decoded form of a slot's first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthByte {
    /// End-of-sequence sentinel
    Terminator,

    /// Length of the record content starting at the next address
    Length(u8),
}

impl LengthByte {
    /// Decode a raw device byte
    pub fn decode(byte: u8) -> Self {
        if byte == TERMINATOR {
            LengthByte::Terminator
        } else {
            LengthByte::Length(byte)
        }
    }
}

impl From<u8> for LengthByte {
    fn from(byte: u8) -> Self {
        Self::decode(byte)
    }
}
