//! # nvtext
//!
//! A compact persistent store for variable-length text records inside a
//! fixed-size, byte-addressable, erase-cycle-limited memory region (an
//! EEPROM-like device), with:
//! - Random-access update of any record by 1-based position
//! - Automatic shifting of all records that follow a resized one
//! - A single terminator sentinel marking end-of-data
//! - An optional bound on the number of records
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │               CLI / TCP Clients (line-oriented)              │
//! │              N=text   ?   #   !   h                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Console Session                              │
//! │           (parse line → dispatch → reply)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Record Store                                │
//! │     (packed length-prefixed records, terminator 0xFF)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  MemDevice  │          │ FileDevice  │
//!   │  (testing)  │          │   (image)   │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! The on-device layout is self-describing: a scan from address 0 recovers
//! the full record sequence after any restart, with no side index or cache.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod device;
pub mod store;
pub mod protocol;
pub mod console;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::Config;
pub use device::{Device, FileDevice, MemDevice};
pub use store::{RecordEntry, RecordStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of nvtext
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
