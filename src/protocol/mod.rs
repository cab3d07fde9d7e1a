//! Protocol Module
//!
//! The line-oriented command grammar spoken by the console session and the
//! TCP endpoint. One command per line, newline-terminated.
//!
//! ## Commands
//! ```text
//! N=text   - write `text` as record N (N = decimal integer >= 1)
//! ?        - show all records
//! #        - show the record count
//! !        - initialize the store (asks y/n first)
//! h        - show help
//! ```
//!
//! An empty line is a no-op; anything else is reported as invalid. Only the
//! first byte is inspected for `?`, `#`, `!`, and `h`, so trailing text on
//! those lines is ignored. In a write, everything after the first `=` is
//! content, including further `=` bytes.

mod command;
mod parser;

pub use command::Command;
pub use parser::parse_line;
