//! Network Module
//!
//! TCP endpoint for the line protocol.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One thread per connection, bounded by `max_connections`
//! - Each connection runs a console session against the shared store,
//!   taking the store lock per command

mod connection;
mod server;

pub use connection::Connection;
pub use server::Server;
