use std::fs::OpenOptions;
use std::os::fd::{AsRawFd, RawFd};
use std::path::Path;

use tracing::info;

use crate::error::{LinkError, Result};
use crate::link::LinkStream;

/// Baud rate used by the original radio bridge hardware.
pub const DEFAULT_BAUD: u32 = 9600;

/// Open a serial tty device and configure it raw 8N1 at the given baud rate.
///
/// Reads block until at least one byte arrives (`VMIN=1, VTIME=0`), matching
/// the frame layer's chunked read loop. No flow control, no echo, no line
/// discipline translation.
pub fn open_serial(path: impl AsRef<Path>, baud: u32) -> Result<LinkStream> {
    let path = path.as_ref();
    let speed = baud_constant(baud).ok_or(LinkError::UnsupportedBaud(baud))?;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| LinkError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

    configure_raw(file.as_raw_fd(), speed).map_err(|e| LinkError::Configure {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(?path, baud, "opened serial link");
    Ok(LinkStream::from_serial(file))
}

/// Map a numeric baud rate to its termios constant.
fn baud_constant(baud: u32) -> Option<libc::speed_t> {
    let speed = match baud {
        1200 => libc::B1200,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        230400 => libc::B230400,
        _ => return None,
    };
    Some(speed)
}

fn configure_raw(fd: RawFd, speed: libc::speed_t) -> std::io::Result<()> {
    // SAFETY: `termios` is a valid writable pointer for tcgetattr/tcsetattr,
    // and `fd` is an open descriptor owned by the caller for the duration of
    // this call.
    unsafe {
        let mut termios: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &mut termios) != 0 {
            return Err(std::io::Error::last_os_error());
        }

        libc::cfmakeraw(&mut termios);
        libc::cfsetispeed(&mut termios, speed);
        libc::cfsetospeed(&mut termios, speed);

        // 8N1
        termios.c_cflag &= !libc::PARENB;
        termios.c_cflag &= !libc::CSTOPB;
        termios.c_cflag &= !libc::CSIZE;
        termios.c_cflag |= libc::CS8;
        termios.c_cflag |= libc::CREAD | libc::CLOCAL;

        // Block until at least one byte arrives.
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;

        if libc::tcsetattr(fd, libc::TCSANOW, &termios) != 0 {
            return Err(std::io::Error::last_os_error());
        }
    }
    Ok(())
}
