//! Configuration for nvtext
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for an nvtext instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Device Configuration
    // -------------------------------------------------------------------------
    /// Path of the device image file
    pub image_path: PathBuf,

    /// Device capacity in bytes, used when creating a new image.
    /// An existing image keeps its own size.
    pub capacity: usize,

    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Optional bound on the number of records (None = unlimited)
    pub max_records: Option<usize>,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("./nvtext.img"),
            capacity: 1024, // a typical small EEPROM part
            max_records: None,
            listen_addr: "127.0.0.1:7878".to_string(),
            max_connections: 64,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the device image path
    pub fn image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.image_path = path.into();
        self
    }

    /// Set the device capacity for newly created images (in bytes)
    pub fn capacity(mut self, bytes: usize) -> Self {
        self.config.capacity = bytes;
        self
    }

    /// Set the record bound (None = unlimited)
    pub fn max_records(mut self, bound: Option<usize>) -> Self {
        self.config.max_records = bound;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
