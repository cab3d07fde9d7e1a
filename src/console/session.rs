//! Command session
//!
//! One session drives one line channel. Store failures are reported as
//! messages and the session keeps accepting input; only channel I/O errors
//! end it.

use std::io::{BufRead, Write};

use parking_lot::Mutex;

use crate::device::Device;
use crate::error::Result;
use crate::protocol::{parse_line, Command};
use crate::store::RecordStore;

/// Line-oriented command session over any `BufRead`/`Write` pair.
///
/// The reply shapes for `?` and `#` (`Number of strings: N`,
/// `String read from position P=content`) are parsed by existing host
/// tooling and must not change.
pub struct Session<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Run against an exclusively owned store until EOF on the input.
    pub fn run<D: Device>(mut self, store: &mut RecordStore<D>) -> Result<()> {
        while let Some(line) = self.next_line()? {
            match parse_line(&line) {
                Command::Init => {
                    if self.confirm_init()? {
                        store.init()?;
                        writeln!(self.writer, "Store initialized")?;
                    } else {
                        writeln!(self.writer, "Cancelled")?;
                    }
                    self.writer.flush()?;
                }
                command => self.dispatch(store, &command)?,
            }
        }
        Ok(())
    }

    /// Run against a store shared between sessions.
    ///
    /// The store lock is held per command, never across the blocking read
    /// of the next line: one stalled client must not wedge the others.
    pub fn run_shared<D: Device>(mut self, store: &Mutex<RecordStore<D>>) -> Result<()> {
        while let Some(line) = self.next_line()? {
            match parse_line(&line) {
                Command::Init => {
                    // confirmation happens before the lock is taken
                    if self.confirm_init()? {
                        store.lock().init()?;
                        writeln!(self.writer, "Store initialized")?;
                    } else {
                        writeln!(self.writer, "Cancelled")?;
                    }
                    self.writer.flush()?;
                }
                command => {
                    let mut guard = store.lock();
                    self.dispatch(&mut guard, &command)?;
                }
            }
        }
        Ok(())
    }

    /// Read the next line, stripping the trailing newline (and a CR, for
    /// CRLF clients). Returns None on EOF.
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Prompt `y/n` and read one more line; only a leading `y` confirms.
    fn confirm_init(&mut self) -> Result<bool> {
        writeln!(self.writer, "Are you sure? (y/n)")?;
        self.writer.flush()?;

        let answer = self.next_line()?.unwrap_or_default();
        Ok(answer.as_bytes().first() == Some(&b'y'))
    }

    fn dispatch<D: Device>(
        &mut self,
        store: &mut RecordStore<D>,
        command: &Command,
    ) -> Result<()> {
        match command {
            Command::Empty => {}
            Command::Write { position, text } => {
                if let Err(e) = store.write(*position, text.as_bytes()) {
                    writeln!(self.writer, "Write failed: {}", e)?;
                }
            }
            Command::List => match store.entries() {
                Ok(entries) => {
                    writeln!(self.writer, "Number of strings: {}", entries.len())?;
                    for entry in entries {
                        writeln!(
                            self.writer,
                            "String read from position {}={}",
                            entry.position,
                            String::from_utf8_lossy(&entry.content)
                        )?;
                    }
                }
                Err(e) => writeln!(self.writer, "Cannot read store: {}", e)?,
            },
            Command::Count => match store.check() {
                Ok(count) => writeln!(self.writer, "Number of strings: {}", count)?,
                Err(e) => writeln!(self.writer, "Cannot read store: {}", e)?,
            },
            Command::Help => self.print_help()?,
            Command::Invalid => writeln!(self.writer, "Invalid command. 'h' for help")?,
            // handled by the run loops
            Command::Init => {}
        }
        self.writer.flush()?;
        Ok(())
    }

    fn print_help(&mut self) -> Result<()> {
        writeln!(self.writer, "Available commands:")?;
        writeln!(self.writer, "N=string   - Write string at position N")?;
        writeln!(self.writer, "?          - Show all strings")?;
        writeln!(self.writer, "#          - Show number of strings")?;
        writeln!(self.writer, "!          - Initialize store")?;
        writeln!(self.writer, "h          - Show help")?;
        Ok(())
    }
}
