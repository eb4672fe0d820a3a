//! Unix terminal backend using termios and ANSI escape sequences.

use std::io;
use std::os::unix::io::AsRawFd;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};
use std::sync::{Arc, Mutex};

use promptkit_core::{
    ansi, ClearType, ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, InterruptGuard,
    KeyDecoder, KeyToken, RawModeGuard,
};

/// How long a lone ESC waits for the rest of a sequence.
const ESCAPE_TIMEOUT_MS: i32 = 50;

const READ_BUFFER_SIZE: usize = 1024;

/// Flag of the innermost live interrupt guard, read by the SIGINT handler.
static INTERRUPT_FLAG: AtomicPtr<AtomicBool> = AtomicPtr::new(ptr::null_mut());

fn write_all_fd(fd: i32, bytes: &[u8]) -> io::Result<()> {
    let mut written = 0;
    while written < bytes.len() {
        let result = unsafe {
            libc::write(
                fd,
                bytes[written..].as_ptr() as *const libc::c_void,
                bytes.len() - written,
            )
        };
        if result == -1 {
            let error = io::Error::last_os_error();
            if error.raw_os_error() == Some(libc::EINTR) {
                continue;
            }
            return Err(error);
        }
        written += result as usize;
    }
    Ok(())
}

extern "C" fn handle_sigint(_signal: libc::c_int) {
    let flag = INTERRUPT_FLAG.load(Ordering::SeqCst);
    if !flag.is_null() {
        // The guard that published the pointer keeps the flag alive.
        unsafe { (*flag).store(true, Ordering::SeqCst) };
    }
    let show = ansi::SHOW_CURSOR.as_bytes();
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            show.as_ptr() as *const libc::c_void,
            show.len(),
        );
    }
}

pub struct UnixConsoleInput {
    stdin_fd: i32,
    decoder: Mutex<KeyDecoder>,
}

impl UnixConsoleInput {
    pub fn new() -> io::Result<Self> {
        let stdin_fd = io::stdin().as_raw_fd();
        if unsafe { libc::isatty(stdin_fd) } == 0 {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "stdin is not a TTY"));
        }
        Ok(Self {
            stdin_fd,
            decoder: Mutex::new(KeyDecoder::new()),
        })
    }

    fn enter_raw_mode(fd: i32) -> io::Result<libc::termios> {
        let mut original_termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut original_termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let mut raw = original_termios;
        raw.c_lflag &= !(libc::ICANON
            | libc::ECHO
            | libc::ECHOE
            | libc::ECHOK
            | libc::ECHONL
            | libc::ISIG
            | libc::IEXTEN);
        raw.c_iflag &= !(libc::IXON
            | libc::IXOFF
            | libc::ICRNL
            | libc::INLCR
            | libc::IGNCR
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag &= !libc::CSIZE;
        raw.c_cflag |= libc::CS8;
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(original_termios)
    }

    fn query_window_size() -> io::Result<(u16, u16)> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        if unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok((ws.ws_col, ws.ws_row))
    }

    /// Wait for input. Returns false on timeout.
    fn poll_readable(&self, timeout_ms: i32) -> io::Result<bool> {
        let mut poll_fd = libc::pollfd {
            fd: self.stdin_fd,
            events: libc::POLLIN,
            revents: 0,
        };
        loop {
            let result = unsafe { libc::poll(&mut poll_fd, 1, timeout_ms) };
            if result == -1 {
                let error = io::Error::last_os_error();
                if error.raw_os_error() == Some(libc::EINTR) {
                    continue;
                }
                return Err(error);
            }
            return Ok(result > 0);
        }
    }
}

impl ConsoleInput for UnixConsoleInput {
    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard> {
        let stdin_fd = self.stdin_fd;
        let original_termios = Self::enter_raw_mode(stdin_fd)?;
        write_all_fd(libc::STDOUT_FILENO, ansi::ENABLE_BRACKETED_PASTE.as_bytes())?;
        log::debug!("raw mode enabled on fd {stdin_fd}");

        let restore_fn = move || {
            let _ = write_all_fd(
                libc::STDOUT_FILENO,
                ansi::DISABLE_BRACKETED_PASTE.as_bytes(),
            );
            unsafe {
                let _ = libc::tcsetattr(stdin_fd, libc::TCSANOW, &original_termios);
            }
            log::debug!("raw mode restored on fd {stdin_fd}");
        };

        Ok(RawModeGuard::new(restore_fn, "Unix VT"))
    }

    fn read_keys(&self) -> ConsoleResult<Option<Vec<KeyToken>>> {
        let mut decoder = self
            .decoder
            .lock()
            .map_err(|_| ConsoleError::Terminal("key decoder poisoned".to_string()))?;
        let mut buffer = [0u8; READ_BUFFER_SIZE];

        loop {
            // Block indefinitely unless a lone ESC is waiting to be resolved.
            let timeout = if decoder.has_pending_escape() {
                ESCAPE_TIMEOUT_MS
            } else {
                -1
            };

            if !self.poll_readable(timeout)? {
                let keys = decoder.flush();
                if !keys.is_empty() {
                    return Ok(Some(keys));
                }
                continue;
            }

            let result = unsafe {
                libc::read(
                    self.stdin_fd,
                    buffer.as_mut_ptr() as *mut libc::c_void,
                    buffer.len(),
                )
            };

            if result == -1 {
                let error = io::Error::last_os_error();
                match error.raw_os_error() {
                    Some(libc::EINTR) | Some(libc::EAGAIN) => continue,
                    _ => return Err(error.into()),
                }
            }

            if result == 0 {
                let keys = decoder.flush();
                return Ok(if keys.is_empty() { None } else { Some(keys) });
            }

            let keys = decoder.feed(&buffer[..result as usize]);
            if !keys.is_empty() {
                return Ok(Some(keys));
            }
        }
    }

    fn get_window_size(&self) -> ConsoleResult<(u16, u16)> {
        Ok(Self::query_window_size()?)
    }

    fn interrupt_guard(&self) -> ConsoleResult<InterruptGuard> {
        Ok(install_interrupt_guard()?)
    }
}

/// Route SIGINT into a fresh flag until the returned guard drops.
///
/// Guards nest: dropping one puts back the handler and flag that were live
/// when it was created.
fn install_interrupt_guard() -> io::Result<InterruptGuard> {
    let flag = Arc::new(AtomicBool::new(false));
    let flag_ptr = Arc::as_ptr(&flag) as *mut AtomicBool;
    let previous_flag = INTERRUPT_FLAG.swap(flag_ptr, Ordering::SeqCst);

    let mut action: libc::sigaction = unsafe { std::mem::zeroed() };
    action.sa_sigaction = handle_sigint as usize;
    action.sa_flags = libc::SA_RESTART;
    let mut previous_action: libc::sigaction = unsafe { std::mem::zeroed() };
    unsafe { libc::sigemptyset(&mut action.sa_mask) };
    if unsafe { libc::sigaction(libc::SIGINT, &action, &mut previous_action) } != 0 {
        INTERRUPT_FLAG.store(previous_flag, Ordering::SeqCst);
        return Err(io::Error::last_os_error());
    }

    // Raw pointers are not Send; the address is only handed back to the static.
    let previous_addr = previous_flag as usize;
    let held = Arc::clone(&flag);
    let restore_fn = move || {
        unsafe {
            libc::sigaction(libc::SIGINT, &previous_action, ptr::null_mut());
        }
        INTERRUPT_FLAG.store(previous_addr as *mut AtomicBool, Ordering::SeqCst);
        drop(held);
    };

    Ok(InterruptGuard::new(flag, restore_fn))
}

/// Unix console output implementation using ANSI escape sequences.
///
/// Writes are buffered until [`ConsoleOutput::flush`].
pub struct UnixConsoleOutput {
    stdout_fd: i32,
    buffer: Mutex<Vec<u8>>,
}

impl UnixConsoleOutput {
    pub fn new() -> ConsoleResult<Self> {
        if unsafe { libc::isatty(libc::STDOUT_FILENO) } == 0 {
            return Err(ConsoleError::Terminal("stdout is not a TTY".to_string()));
        }

        Ok(Self {
            stdout_fd: libc::STDOUT_FILENO,
            buffer: Mutex::new(Vec::new()),
        })
    }

    fn write_bytes(&self, bytes: &[u8]) -> ConsoleResult<()> {
        self.buffer
            .lock()
            .map_err(|_| ConsoleError::Terminal("output buffer poisoned".to_string()))?
            .extend_from_slice(bytes);
        Ok(())
    }
}

impl ConsoleOutput for UnixConsoleOutput {
    fn write_text(&self, text: &str) -> ConsoleResult<()> {
        self.write_bytes(text.as_bytes())
    }

    fn move_cursor_relative(&self, row_delta: i16, col_delta: i16) -> ConsoleResult<()> {
        self.write_bytes(ansi::move_relative(row_delta, col_delta).as_bytes())
    }

    fn clear(&self, clear_type: ClearType) -> ConsoleResult<()> {
        self.write_bytes(ansi::clear(clear_type).as_bytes())
    }

    fn set_cursor_visible(&self, visible: bool) -> ConsoleResult<()> {
        self.write_bytes(ansi::cursor_visibility(visible).as_bytes())
    }

    fn flush(&self) -> ConsoleResult<()> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| ConsoleError::Terminal("output buffer poisoned".to_string()))?;
        if !buffer.is_empty() {
            write_all_fd(self.stdout_fd, &buffer)?;
            buffer.clear();
        }
        Ok(())
    }
}

impl Drop for UnixConsoleOutput {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            log::warn!("failed to flush terminal output: {e}");
        }
    }
}
