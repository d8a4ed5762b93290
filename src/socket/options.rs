use std::os::fd::AsRawFd;
use crate::error::{SocketError, errno, log_err};
use super::SockType;

/// Timeout applied when the caller passes 0.
pub const DEFAULT_TIMEOUT_MS: u32 = 3000;

fn set_int_option<S: AsRawFd>(
	socket: &S,
	level: libc::c_int,
	name: libc::c_int,
	val: libc::c_int,
	option: &'static str,
) -> std::io::Result<()> {
	let result = unsafe {
		libc::setsockopt(
			socket.as_raw_fd(),
			level,
			name,
			&val as *const _ as *const libc::c_void,
			std::mem::size_of::<libc::c_int>() as libc::socklen_t,
		)
	};
	if result == -1 {
		Err(SocketError::SetOption { errno: errno(), option }.into())
	} else {
		Ok(())
	}
}

/// Converts a millisecond timeout to a timeval. 0 means the 3 s default.
fn timeout_to_timeval(timeout_ms: u32) -> libc::timeval {
	let timeout_ms = if timeout_ms == 0 { DEFAULT_TIMEOUT_MS } else { timeout_ms };
	libc::timeval {
		tv_sec: (timeout_ms / 1000) as libc::time_t,
		tv_usec: ((timeout_ms % 1000) * 1000) as libc::suseconds_t,
	}
}

/// Sets SO_RCVTIMEO and SO_SNDTIMEO to the same value.
///
/// A `timeout_ms` of 0 applies [`DEFAULT_TIMEOUT_MS`]. The send timeout
/// also bounds blocking `connect()`.
pub fn settimeo<S: AsRawFd>(socket: &S, timeout_ms: u32) -> std::io::Result<()> {
	let timeout = timeout_to_timeval(timeout_ms);

	for (name, option) in [(libc::SO_RCVTIMEO, "SO_RCVTIMEO"), (libc::SO_SNDTIMEO, "SO_SNDTIMEO")] {
		let result = unsafe {
			libc::setsockopt(
				socket.as_raw_fd(),
				libc::SOL_SOCKET,
				name,
				&timeout as *const _ as *const libc::c_void,
				std::mem::size_of::<libc::timeval>() as libc::socklen_t,
			)
		};
		if result == -1 {
			let err = SocketError::SetOption { errno: errno(), option };
			log_err!("Failed to set {}", option);
			return Err(err.into());
		}
	}
	Ok(())
}

/// Sets SO_REUSEPORT on a socket.
///
/// Allows multiple sockets to bind the same port.
/// The kernel spreads incoming connections across them.
pub fn set_reuse_port<S: AsRawFd>(socket: &S, enable: bool) -> std::io::Result<()> {
	set_int_option(socket, libc::SOL_SOCKET, libc::SO_REUSEPORT, enable as libc::c_int, "SO_REUSEPORT")
}

/// Enables TCP Fast Open on a listener with the given pending-request queue length.
pub fn set_tcp_fastopen<S: AsRawFd>(socket: &S, queue_len: i32) -> std::io::Result<()> {
	set_int_option(socket, libc::IPPROTO_TCP, libc::TCP_FASTOPEN, queue_len, "TCP_FASTOPEN")
}

/// Reads SO_TYPE.
pub fn get_sock_type<S: AsRawFd>(socket: &S) -> std::io::Result<SockType> {
	let mut val: libc::c_int = 0;
	let mut len = std::mem::size_of::<libc::c_int>() as libc::socklen_t;
	let result = unsafe {
		libc::getsockopt(
			socket.as_raw_fd(),
			libc::SOL_SOCKET,
			libc::SO_TYPE,
			&mut val as *mut _ as *mut libc::c_void,
			&mut len,
		)
	};
	if result == -1 {
		let err = SocketError::GetOption { errno: errno(), option: "SO_TYPE" };
		log_err!("getsockopt(SOL_TYPE)");
		return Err(err.into());
	}
	SockType::from_raw(val)
}

/// Returns the local port a socket is bound to, in host byte order.
pub fn get_socket_local_port<S: AsRawFd>(socket: &S) -> std::io::Result<u16> {
	let addr = super::raw::local_addr_raw(socket.as_raw_fd()).inspect_err(|_| {
		log_err!("Failed to get server addr");
	})?;
	Ok(addr.port())
}
