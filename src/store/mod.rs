//! Record Store Module
//!
//! The packed record sequence and the algorithms operating on it. This is
//! the on-device wire format and must stay bit-exact for interoperability
//! with existing stored data.
//!
//! ## Device Layout
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Record 1                                                 │
//! │ ┌──────────┬──────────────────────────┐                  │
//! │ │ Len (1)  │  Content (Len bytes)     │  Len in 0..=254  │
//! │ └──────────┴──────────────────────────┘                  │
//! ├──────────────────────────────────────────────────────────┤
//! │ Record 2 ... Record N (same shape, packed back to back)  │
//! ├──────────────────────────────────────────────────────────┤
//! │ Terminator: one 0xFF byte                                │
//! ├──────────────────────────────────────────────────────────┤
//! │ Unused tail (stale bytes, never read)                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Records are addressed by 1-based position in the sequence, not by a
//! stored key: record N starts where record N-1 ends. Resizing a record
//! moves every following record and the terminator as one contiguous block.
//!
//! ## Invariants
//! - Exactly one terminator byte, reachable from address 0 by repeatedly
//!   advancing `length + 1`, without ever leaving `[0, capacity)`
//! - A record at address `a` needs `a + 1 + length < capacity`, leaving
//!   room for the following length byte or terminator
//! - 0xFF is never a valid length; content is limited to 254 bytes

mod length;
mod records;

pub use length::{LengthByte, MAX_RECORD_LEN, TERMINATOR};
pub use records::{RecordEntry, RecordStore};
