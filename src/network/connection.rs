//! Connection Handler
//!
//! Handles one client connection: a console session over the TCP stream.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;

use parking_lot::Mutex;

use crate::console::Session;
use crate::device::Device;
use crate::error::{Result, StoreError};
use crate::store::RecordStore;

/// Handles a single client connection
pub struct Connection {
    stream: TcpStream,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Wrap an accepted stream.
    ///
    /// Disables Nagle's algorithm: replies are single short lines.
    pub fn new(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        Ok(Self { stream, peer_addr })
    }

    /// Run the session until the client disconnects.
    ///
    /// Disconnects (EOF, reset, broken pipe) are a normal end of session,
    /// not an error.
    pub fn handle<D: Device>(self, store: &Mutex<RecordStore<D>>) -> Result<()> {
        tracing::debug!(peer = %self.peer_addr, "connection established");

        let reader = BufReader::new(self.stream.try_clone()?);
        let writer = BufWriter::new(self.stream);

        match Session::new(reader, writer).run_shared(store) {
            Ok(()) => {
                tracing::debug!(peer = %self.peer_addr, "client disconnected");
                Ok(())
            }
            Err(StoreError::Io(ref e)) if is_disconnect(e.kind()) => {
                tracing::debug!(peer = %self.peer_addr, "connection closed by client");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(peer = %self.peer_addr, error = %e, "connection error");
                Err(e)
            }
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: std::io::ErrorKind) -> bool {
    matches!(
        kind,
        std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe
    )
}
