//! Output streams

use parking_lot::Mutex;
use std::io;

/// Byte sink a handler writes through
///
/// Writes take `&self`: a stream is shared between the handler that writes
/// to it and the factory that eventually tears it down.
pub trait OutputStream: Send + Sync {
    /// Write all of `data` or fail
    fn write_bytes(&self, data: &[u8]) -> io::Result<()>;
}

/// Serial port that can be opened and closed by a stream factory
pub trait SerialPort: OutputStream {
    /// Open the port; `baud` is `None` for ports without a configurable rate
    fn begin(&self, baud: Option<u32>);

    /// Close the port
    fn end(&self);
}

/// In-memory serial port
///
/// Captures everything written while the port is open. Writes to a closed
/// port fail with [`io::ErrorKind::NotConnected`]. Useful on hosts without
/// hardware serial ports and in tests.
#[derive(Debug, Default)]
pub struct MemoryPort {
    state: Mutex<PortState>,
}

#[derive(Debug, Default)]
struct PortState {
    open: bool,
    baud: Option<u32>,
    data: Vec<u8>,
}

impl MemoryPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    /// Baud rate passed to the last `begin`
    pub fn baud(&self) -> Option<u32> {
        self.state.lock().baud
    }

    /// Copy of all captured bytes
    pub fn contents(&self) -> Vec<u8> {
        self.state.lock().data.clone()
    }

    /// Captured bytes as text (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.state.lock().data).into_owned()
    }

    /// Take and clear the captured bytes
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut self.state.lock().data)
    }
}

impl OutputStream for MemoryPort {
    fn write_bytes(&self, data: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "port is closed"));
        }
        state.data.extend_from_slice(data);
        Ok(())
    }
}

impl SerialPort for MemoryPort {
    fn begin(&self, baud: Option<u32>) {
        let mut state = self.state.lock();
        state.open = true;
        state.baud = baud;
    }

    fn end(&self) {
        self.state.lock().open = false;
    }
}
