/// Socket setup errors.
///
/// Every variant that comes from a syscall carries the errno observed at
/// that call, so the cause survives any close done while unwinding.
#[derive(Debug, thiserror::Error)]
pub enum SocketError {
    #[error("socket() failed: {}", errno_to_str(*.errno))]
    Create { errno: i32 },

    #[error("bind({addr}) failed: {}", errno_to_str(*.errno))]
    Bind { errno: i32, addr: String },

    #[error("listen(backlog={backlog}) failed: {}", errno_to_str(*.errno))]
    Listen { errno: i32, backlog: i32 },

    #[error("connect({addr}) failed: {}", errno_to_str(*.errno))]
    Connect { errno: i32, addr: String },

    #[error("getsockname() failed: {}", errno_to_str(*.errno))]
    LocalAddr { errno: i32 },

    #[error("setsockopt({option}) failed: {}", errno_to_str(*.errno))]
    SetOption { errno: i32, option: &'static str },

    #[error("getsockopt({option}) failed: {}", errno_to_str(*.errno))]
    GetOption { errno: i32, option: &'static str },

    #[error("sendto(MSG_FASTOPEN, {expected}) accepted {sent}: {}", errno_to_str(*.errno))]
    FastOpenShort { errno: i32, expected: usize, sent: isize },

    #[error("invalid address: {reason}")]
    InvalidAddress { reason: String },

    #[error("unsupported address family {family}")]
    UnsupportedFamily { family: i32 },

    #[error("unsupported socket type {sock_type}")]
    UnsupportedType { sock_type: i32 },

    #[error("reuseport group needs at least one listener")]
    EmptyGroup,
}

impl SocketError {
    /// Returns the errno recorded when this error was raised.
    pub fn errno(&self) -> i32 {
        match self {
            SocketError::Create { errno }
            | SocketError::Bind { errno, .. }
            | SocketError::Listen { errno, .. }
            | SocketError::Connect { errno, .. }
            | SocketError::LocalAddr { errno }
            | SocketError::SetOption { errno, .. }
            | SocketError::GetOption { errno, .. }
            | SocketError::FastOpenShort { errno, .. } => *errno,
            SocketError::InvalidAddress { .. } | SocketError::EmptyGroup => libc::EINVAL,
            SocketError::UnsupportedFamily { .. } => libc::EAFNOSUPPORT,
            SocketError::UnsupportedType { .. } => libc::ESOCKTNOSUPPORT,
        }
    }
}

/// Returns current errno value.
#[inline]
pub fn errno() -> i32 {
    unsafe { *libc::__errno_location() }
}

/// Overwrites errno. Used to restore it after logging.
#[inline]
pub(crate) fn set_errno(value: i32) {
    unsafe { *libc::__errno_location() = value }
}

/// Describes errno the way test logs expect: "None" when unset.
pub(crate) fn clean_errno(errno: i32) -> String {
    if errno == 0 {
        "None".into()
    } else {
        std::io::Error::from_raw_os_error(errno).to_string()
    }
}

/// Extracts the errno carried by an error produced by this crate.
///
/// Falls back to the OS error code, then to `EIO`.
pub fn raw_errno(err: &std::io::Error) -> i32 {
    if let Some(inner) = err.get_ref().and_then(|e| e.downcast_ref::<SocketError>()) {
        return inner.errno();
    }
    err.raw_os_error().unwrap_or(libc::EIO)
}

/// Converts errno to human-readable string.
fn errno_to_str(errno: i32) -> String {
    match errno {
        0 => "no error reported".into(),
        libc::EACCES => "permission denied".into(),
        libc::EADDRINUSE => "address already in use".into(),
        libc::EADDRNOTAVAIL => "address not available".into(),
        libc::EAFNOSUPPORT => "address family not supported".into(),
        libc::EAGAIN => "resource temporarily unavailable".into(),
        libc::EBADF => "bad file descriptor".into(),
        libc::ECONNREFUSED => "connection refused".into(),
        libc::ECONNRESET => "connection reset by peer".into(),
        libc::EINPROGRESS => "operation in progress".into(),
        libc::EINTR => "interrupted by signal".into(),
        libc::EINVAL => "invalid argument".into(),
        libc::EMFILE => "too many open files".into(),
        libc::ENETUNREACH => "network unreachable".into(),
        libc::ENOBUFS => "no buffer space available".into(),
        libc::ENOTCONN => "not connected".into(),
        libc::ENOTSOCK => "not a socket".into(),
        libc::EPIPE => "broken pipe".into(),
        libc::EPROTONOSUPPORT => "protocol not supported".into(),
        libc::ETIMEDOUT => "connection timed out".into(),
        _ => format!("errno {}", errno),
    }
}

/// Maps errno to std::io::ErrorKind.
fn errno_to_kind(errno: i32) -> std::io::ErrorKind {
    match errno {
        libc::EACCES | libc::EPERM => std::io::ErrorKind::PermissionDenied,
        libc::EADDRINUSE => std::io::ErrorKind::AddrInUse,
        libc::EADDRNOTAVAIL => std::io::ErrorKind::AddrNotAvailable,
        libc::EAGAIN => std::io::ErrorKind::WouldBlock,
        libc::ECONNREFUSED => std::io::ErrorKind::ConnectionRefused,
        libc::ECONNRESET => std::io::ErrorKind::ConnectionReset,
        libc::EINTR => std::io::ErrorKind::Interrupted,
        libc::EINVAL => std::io::ErrorKind::InvalidInput,
        libc::ENOTCONN => std::io::ErrorKind::NotConnected,
        libc::EPIPE => std::io::ErrorKind::BrokenPipe,
        libc::ETIMEDOUT => std::io::ErrorKind::TimedOut,
        libc::EAFNOSUPPORT | libc::EPROTONOSUPPORT | libc::ESOCKTNOSUPPORT => {
            std::io::ErrorKind::Unsupported
        }
        _ => std::io::ErrorKind::Other,
    }
}

impl From<SocketError> for std::io::Error {
    fn from(err: SocketError) -> Self {
        std::io::Error::new(errno_to_kind(err.errno()), err)
    }
}

/// Logs a failure with file, line and the current errno.
///
/// errno is saved before the event is emitted and restored afterwards, so a
/// subscriber that touches the filesystem cannot clobber it.
macro_rules! log_err {
    ($($arg:tt)+) => {{
        let saved = $crate::errno();
        ::tracing::error!(
            file = file!(),
            line = line!(),
            errno = %$crate::error::clean_errno(saved),
            $($arg)+
        );
        $crate::error::set_errno(saved);
    }};
}
pub(crate) use log_err;
