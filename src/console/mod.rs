//! Console Module
//!
//! The interactive command session: reads lines from a channel, dispatches
//! to the record store, writes short human-readable replies. Used both by
//! `nvtext-cli console` on stdin/stdout and by the TCP server, one session
//! per connection.

mod session;

pub use session::Session;
