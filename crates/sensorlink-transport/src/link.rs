use std::io::{Read, Write};

use crate::error::Result;

/// A connected byte link — implements Read + Write.
///
/// This is the fundamental I/O type the frame layer consumes. It wraps
/// either a serial tty device or one end of a connected socket pair
/// (loopback links, tests, bridges).
pub struct LinkStream {
    inner: LinkStreamInner,
}

enum LinkStreamInner {
    /// A serial device opened read+write and configured raw.
    Serial(std::fs::File),
    /// One end of a connected stream socket.
    #[cfg(unix)]
    Socket(std::os::unix::net::UnixStream),
}

impl Read for LinkStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            LinkStreamInner::Serial(file) => file.read(buf),
            #[cfg(unix)]
            LinkStreamInner::Socket(stream) => stream.read(buf),
        }
    }
}

impl Write for LinkStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            LinkStreamInner::Serial(file) => file.write(buf),
            #[cfg(unix)]
            LinkStreamInner::Socket(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            LinkStreamInner::Serial(file) => file.flush(),
            #[cfg(unix)]
            LinkStreamInner::Socket(stream) => stream.flush(),
        }
    }
}

impl LinkStream {
    /// Create a LinkStream from an opened serial device.
    pub(crate) fn from_serial(file: std::fs::File) -> Self {
        Self {
            inner: LinkStreamInner::Serial(file),
        }
    }

    /// Create a LinkStream from a connected socket.
    #[cfg(unix)]
    pub(crate) fn from_socket(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: LinkStreamInner::Socket(stream),
        }
    }

    /// Create a connected loopback pair.
    ///
    /// Bytes written to one end are read from the other. Used for tests and
    /// for running a hub and a simulated node inside one process.
    #[cfg(unix)]
    pub fn pair() -> Result<(Self, Self)> {
        let (left, right) = std::os::unix::net::UnixStream::pair()?;
        Ok((Self::from_socket(left), Self::from_socket(right)))
    }

    /// Try to clone this link (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        match &self.inner {
            LinkStreamInner::Serial(file) => {
                let cloned = file.try_clone()?;
                Ok(Self::from_serial(cloned))
            }
            #[cfg(unix)]
            LinkStreamInner::Socket(stream) => {
                let cloned = stream.try_clone()?;
                Ok(Self::from_socket(cloned))
            }
        }
    }
}

impl std::fmt::Debug for LinkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            LinkStreamInner::Serial(_) => f
                .debug_struct("LinkStream")
                .field("type", &"serial")
                .finish(),
            #[cfg(unix)]
            LinkStreamInner::Socket(_) => f
                .debug_struct("LinkStream")
                .field("type", &"socket")
                .finish(),
        }
    }
}
