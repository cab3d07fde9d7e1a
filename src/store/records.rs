//! Record store implementation
//!
//! Scan, read, write-with-shift, and lifecycle over a `Device`.

use crate::device::Device;
use crate::error::{Result, StoreError};

use super::length::{LengthByte, MAX_RECORD_LEN, TERMINATOR};

/// One record of the sequence, as reported by [`RecordStore::entries`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    /// 1-based position in the sequence
    pub position: usize,

    /// Device address of the record's length byte
    pub address: usize,

    /// Record content
    pub content: Vec<u8>,
}

/// Persistent store of variable-length records on a byte-addressable device.
///
/// ## Concurrency Model
///
/// Single-threaded and synchronous: every operation runs to completion
/// against the device before returning, and entry points are non-reentrant
/// critical sections. Hosts that share a store across threads wrap it in a
/// mutex (see the network server).
///
/// ## Write Endurance
///
/// The device has bounded write cycles. The store never rewrites bytes it
/// does not have to: an overwrite with unchanged length touches only the
/// target record, and a read or count touches nothing.
pub struct RecordStore<D: Device> {
    /// The backing device, owned exclusively while the store is active
    device: D,

    /// Optional bound on the number of records (None = unlimited)
    max_records: Option<usize>,
}

impl<D: Device> RecordStore<D> {
    /// Attach to a device without inspecting its content.
    ///
    /// Use [`RecordStore::open`] for the bring-up path that validates the
    /// sequence and recovers from corruption.
    pub fn new(device: D) -> Self {
        Self {
            device,
            max_records: None,
        }
    }

    /// Attach to a device, validating its content.
    ///
    /// On startup:
    /// 1. Scan the sequence and log the record count and capacity
    /// 2. If the content is not a well-formed sequence, initialize the
    ///    device to the empty state (data loss accepted in favor of
    ///    availability)
    pub fn open(device: D) -> Result<Self> {
        let mut store = Self::new(device);

        match store.check() {
            Ok(count) => {
                tracing::info!(
                    records = count,
                    capacity = store.capacity(),
                    "record store attached"
                );
            }
            Err(StoreError::CorruptStore) => {
                tracing::warn!("device content invalid, initializing empty store");
                store.init()?;
            }
            Err(e) => return Err(e),
        }

        Ok(store)
    }

    /// Device capacity in bytes
    pub fn capacity(&self) -> usize {
        self.device.capacity()
    }

    /// Borrow the backing device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Consume the store and return the backing device
    pub fn into_device(self) -> D {
        self.device
    }

    /// Flush pending device writes to the backing storage
    pub fn sync(&mut self) -> Result<()> {
        self.device.sync()
    }

    /// Set the bound on the number of records (None = unlimited).
    ///
    /// Affects future writes only; an existing sequence longer than the
    /// bound stays readable.
    pub fn set_max_records(&mut self, bound: Option<usize>) {
        self.max_records = bound;
    }

    /// Current record bound (None = unlimited)
    pub fn max_records(&self) -> Option<usize> {
        self.max_records
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Reset the device to the empty sequence: a terminator at address 0.
    ///
    /// Destroys all records. Idempotent.
    pub fn init(&mut self) -> Result<()> {
        self.device.write_byte(0, TERMINATOR)
    }

    // =========================================================================
    // Validate / Count
    // =========================================================================

    /// Count the records in the sequence.
    ///
    /// Read-only scan from address 0. Returns `CorruptStore` if a record's
    /// declared length leaves no room for a following slot inside the
    /// device, or if no terminator is found. The scan never reads outside
    /// `[0, capacity)`.
    pub fn check(&self) -> Result<usize> {
        let capacity = self.device.capacity();
        let mut addr = 0;
        let mut count = 0;

        while addr < capacity {
            match LengthByte::decode(self.device.read_byte(addr)?) {
                LengthByte::Terminator => return Ok(count),
                LengthByte::Length(len) => {
                    addr += len as usize + 1;
                    if addr >= capacity {
                        return Err(StoreError::CorruptStore);
                    }
                    count += 1;
                }
            }
        }

        Err(StoreError::CorruptStore)
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Read the record at 1-based `position`.
    ///
    /// Hitting the terminator before reaching `position` is `NotFound`;
    /// unlike [`RecordStore::write`], reading never extends the sequence.
    pub fn read(&self, position: usize) -> Result<Vec<u8>> {
        let (addr, len) = self.locate(position)?;

        let mut content = Vec::with_capacity(len);
        for i in 0..len {
            content.push(self.device.read_byte(addr + 1 + i)?);
        }
        Ok(content)
    }

    /// Read the record at `position` into a caller-provided buffer.
    ///
    /// Copies `min(length, buf.len())` content bytes and returns the full
    /// declared length, which may exceed what was copied; callers compare
    /// the two to detect truncation.
    pub fn read_into(&self, position: usize, buf: &mut [u8]) -> Result<usize> {
        let (addr, len) = self.locate(position)?;

        let copy_len = len.min(buf.len());
        for i in 0..copy_len {
            buf[i] = self.device.read_byte(addr + 1 + i)?;
        }
        Ok(len)
    }

    /// Enumerate all records: position, address, and content.
    pub fn entries(&self) -> Result<Vec<RecordEntry>> {
        let count = self.check()?;

        let mut entries = Vec::with_capacity(count);
        let mut addr = 0;
        for position in 1..=count {
            let len = match LengthByte::decode(self.device.read_byte(addr)?) {
                // check() just validated the sequence
                LengthByte::Terminator => return Err(StoreError::CorruptStore),
                LengthByte::Length(len) => len as usize,
            };

            let mut content = Vec::with_capacity(len);
            for i in 0..len {
                content.push(self.device.read_byte(addr + 1 + i)?);
            }

            entries.push(RecordEntry {
                position,
                address: addr,
                content,
            });
            addr += len + 1;
        }

        Ok(entries)
    }

    // =========================================================================
    // Write
    // =========================================================================

    /// Write `data` as the record at 1-based `position`.
    ///
    /// Steps:
    /// 1. Validate position, content length, and the record bound
    /// 2. Scan to the target, lazily extending the sequence with empty
    ///    records when the terminator is met before `position`
    /// 3. Locate the terminator from the target forward
    /// 4. Fail if the content alone cannot fit
    /// 5. Append in place when the target is the terminator slot; otherwise
    ///    shift the block of following records by the size delta, then
    ///    overwrite the target
    ///
    /// On rejection the device is unmodified, except that empty records
    /// created by lazy extension in step 2 are kept: they are valid records
    /// of the sequence, not corruption, and they are not rolled back.
    pub fn write(&mut self, position: usize, data: &[u8]) -> Result<()> {
        if position < 1 {
            return Err(StoreError::InvalidPosition);
        }
        if data.len() > MAX_RECORD_LEN {
            return Err(StoreError::RecordTooLong {
                len: data.len(),
                max: MAX_RECORD_LEN,
            });
        }

        if let Some(bound) = self.max_records {
            let current = self.check()?;
            if position > current && current >= bound {
                tracing::warn!(position, bound, "record bound reached");
                return Err(StoreError::CapacityExceeded { bound });
            }
            if position > bound {
                tracing::warn!(position, bound, "position exceeds record bound");
                return Err(StoreError::CapacityExceeded { bound });
            }
        }

        let capacity = self.device.capacity();
        let new_len = data.len();

        // Step 2: scan to the target, promoting the terminator to an empty
        // record wherever the sequence ends short of the target position
        let mut addr = 0;
        let mut count = 1;
        while count < position {
            match LengthByte::decode(self.device.read_byte(addr)?) {
                LengthByte::Terminator => {
                    if addr + 1 >= capacity {
                        // the relocated terminator would land outside the device
                        tracing::warn!(position, "no space to extend sequence");
                        return Err(StoreError::InsufficientSpace);
                    }
                    self.device.write_byte(addr, 0)?;
                    self.device.write_byte(addr + 1, TERMINATOR)?;
                    addr += 1;
                    count += 1;
                }
                LengthByte::Length(len) => {
                    addr += len as usize + 1;
                    if addr >= capacity {
                        return Err(StoreError::CorruptStore);
                    }
                    count += 1;
                }
            }
        }

        let target = addr;
        let target_slot = LengthByte::decode(self.device.read_byte(target)?);

        // Step 3: find the terminator, scanning from the target rather than
        // from address 0
        let mut terminator = target;
        loop {
            match LengthByte::decode(self.device.read_byte(terminator)?) {
                LengthByte::Terminator => break,
                LengthByte::Length(len) => {
                    terminator += len as usize + 1;
                    if terminator >= capacity {
                        return Err(StoreError::CorruptStore);
                    }
                }
            }
        }

        // Step 4: the content plus its trailing slot byte must fit
        if target + 1 + new_len >= capacity {
            tracing::warn!(position, new_len, capacity, "content does not fit");
            return Err(StoreError::InsufficientSpace);
        }

        let old_len = match target_slot {
            LengthByte::Terminator => {
                // Step 5, fast path: the target does not exist yet and is
                // the last slot, so write record and terminator, no shift
                self.write_record(target, data)?;
                self.device.write_byte(target + 1 + new_len, TERMINATOR)?;
                tracing::debug!(position, len = new_len, address = target, "record appended");
                return Ok(());
            }
            LengthByte::Length(len) => len as usize,
        };

        // Step 5, resize path: move every byte from the end of the target's
        // old body through the terminator (inclusive) by the size delta
        let shift = new_len as isize - old_len as isize;
        if shift != 0 {
            if terminator as isize + shift >= capacity as isize {
                tracing::warn!(position, shift, "no space after shift");
                return Err(StoreError::InsufficientSpace);
            }
            self.shift_block(target + 1 + old_len, terminator, shift)?;
        }

        self.write_record(target, data)?;
        tracing::debug!(position, len = new_len, address = target, shift, "record written");
        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Resolve `position` to `(address, declared length)` for reading
    fn locate(&self, position: usize) -> Result<(usize, usize)> {
        if position < 1 {
            return Err(StoreError::InvalidPosition);
        }
        if let Some(bound) = self.max_records {
            if position > bound {
                return Err(StoreError::CapacityExceeded { bound });
            }
        }

        let capacity = self.device.capacity();
        let mut addr = 0;
        for _ in 1..position {
            match LengthByte::decode(self.device.read_byte(addr)?) {
                LengthByte::Terminator => {
                    return Err(StoreError::NotFound { position });
                }
                LengthByte::Length(len) => {
                    addr += len as usize + 1;
                    if addr >= capacity {
                        return Err(StoreError::CorruptStore);
                    }
                }
            }
        }

        match LengthByte::decode(self.device.read_byte(addr)?) {
            LengthByte::Terminator => Err(StoreError::NotFound { position }),
            LengthByte::Length(len) => {
                let len = len as usize;
                if addr + 1 + len >= capacity {
                    return Err(StoreError::CorruptStore);
                }
                Ok((addr, len))
            }
        }
    }

    /// Write a length byte and content at `addr` (no terminator handling)
    fn write_record(&mut self, addr: usize, data: &[u8]) -> Result<()> {
        self.device.write_byte(addr, data.len() as u8)?;
        for (i, &byte) in data.iter().enumerate() {
            self.device.write_byte(addr + 1 + i, byte)?;
        }
        Ok(())
    }

    /// Move the byte block `[lo, hi]` (inclusive) by `shift` positions.
    ///
    /// Direction-aware to stay overlap-safe: growing (`shift > 0`) copies
    /// from the highest address downward so unread source bytes are never
    /// overwritten; shrinking copies from the lowest address upward.
    fn shift_block(&mut self, lo: usize, hi: usize, shift: isize) -> Result<()> {
        if shift > 0 {
            let delta = shift as usize;
            let mut addr = hi;
            loop {
                let byte = self.device.read_byte(addr)?;
                self.device.write_byte(addr + delta, byte)?;
                if addr == lo {
                    break;
                }
                addr -= 1;
            }
        } else if shift < 0 {
            let delta = (-shift) as usize;
            for addr in lo..=hi {
                let byte = self.device.read_byte(addr)?;
                self.device.write_byte(addr - delta, byte)?;
            }
        }
        Ok(())
    }
}
