//! File-backed device
//!
//! A flat image file of exactly `capacity` bytes. Every read and write goes
//! straight to the file (seek + single-byte I/O): the packed format on the
//! device is the only source of truth, and an unclean restart loses at most
//! the byte being written.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::{Result, StoreError};

use super::memory::ERASED;
use super::Device;

/// Device backed by a flat image file on disk
pub struct FileDevice {
    /// File handle; the mutex makes shared reads possible while the file
    /// position is being moved
    file: Mutex<File>,

    /// Image size, fixed at open time
    capacity: usize,

    /// Image path, kept for logging
    path: PathBuf,
}

impl FileDevice {
    /// Create a new erased image of `capacity` bytes.
    ///
    /// Fails if the file already exists.
    pub fn create(path: &Path, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(StoreError::Image("image capacity must be non-zero".to_string()));
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        file.write_all(&vec![ERASED; capacity])?;
        file.sync_data()?;

        tracing::info!(path = %path.display(), capacity, "created device image");

        Ok(Self {
            file: Mutex::new(file),
            capacity,
            path: path.to_path_buf(),
        })
    }

    /// Open an existing image; its file length is the device capacity.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        let capacity = file.metadata()?.len() as usize;
        if capacity == 0 {
            return Err(StoreError::Image(format!(
                "image {} is empty",
                path.display()
            )));
        }

        Ok(Self {
            file: Mutex::new(file),
            capacity,
            path: path.to_path_buf(),
        })
    }

    /// Open an image, creating an erased one of `capacity` bytes if absent.
    pub fn open_or_create(path: &Path, capacity: usize) -> Result<Self> {
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path, capacity)
        }
    }

    /// Path of the backing image file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_addr(&self, addr: usize) -> Result<()> {
        if addr >= self.capacity {
            return Err(StoreError::AddressOutOfRange {
                addr,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Device for FileDevice {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn read_byte(&self, addr: usize) -> Result<u8> {
        self.check_addr(addr)?;

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(addr as u64))?;

        let mut buf = [0u8; 1];
        file.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn write_byte(&mut self, addr: usize, byte: u8) -> Result<()> {
        self.check_addr(addr)?;

        let file = self.file.get_mut();
        file.seek(SeekFrom::Start(addr as u64))?;
        file.write_all(&[byte])?;
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        self.file.get_mut().sync_data()?;
        Ok(())
    }
}
