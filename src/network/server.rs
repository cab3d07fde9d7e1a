//! TCP Server
//!
//! Accepts connections and runs one console session per client against the
//! shared record store.

use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::config::Config;
use crate::device::Device;
use crate::error::Result;
use crate::store::RecordStore;

use super::Connection;

/// TCP server for the line protocol
pub struct Server<D: Device> {
    config: Config,
    store: Arc<Mutex<RecordStore<D>>>,
}

impl<D: Device + Send + 'static> Server<D> {
    /// Create a new server over a shared store
    pub fn new(config: Config, store: Arc<Mutex<RecordStore<D>>>) -> Self {
        Self { config, store }
    }

    /// Accept and serve connections (blocking).
    pub fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.listen_addr)?;
        tracing::info!(addr = %self.config.listen_addr, "listening");

        let active = Arc::new(AtomicUsize::new(0));

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    continue;
                }
            };

            if active.load(Ordering::SeqCst) >= self.config.max_connections {
                tracing::warn!(
                    max = self.config.max_connections,
                    "connection limit reached, dropping client"
                );
                continue;
            }

            let connection = match Connection::new(stream) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(error = %e, "connection setup failed");
                    continue;
                }
            };

            active.fetch_add(1, Ordering::SeqCst);
            let store = Arc::clone(&self.store);
            let active = Arc::clone(&active);

            thread::spawn(move || {
                let _ = connection.handle(&store);
                active.fetch_sub(1, Ordering::SeqCst);
            });
        }

        Ok(())
    }
}
