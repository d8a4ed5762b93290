mod raw;
mod options;
mod builder;
mod server;
mod client;
mod group;

pub use self::raw::Socket;
pub use self::options::{settimeo, set_reuse_port, set_tcp_fastopen,
						get_sock_type, get_socket_local_port, DEFAULT_TIMEOUT_MS};
pub use self::builder::{ServerOpts, ConnectOpts};
pub use self::server::{start_server, start_mptcp_server, start_server_proto, start_server_addr,
					   LISTEN_BACKLOG};
pub use self::group::{start_reuseport_server, free_fds};
pub use self::client::{connect_to_fd, connect_to_mptcp_fd, connect_to_fd_proto,
					   connect_fd_to_fd, connect_to_addr, fastopen_connect};

use crate::error::SocketError;

/// Multipath TCP protocol number.
///
/// Older libc headers do not carry it.
pub const IPPROTO_MPTCP: libc::c_int = 262;

/// Socket type passed to the `socket()` syscall.
///
/// - `Stream` — reliable, ordered byte stream (TCP, MPTCP)
/// - `Datagram` — unreliable, unordered packets (UDP)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SockType {
	Stream,
	Datagram,
}

impl SockType {
	/// Returns the libc constant for this socket type.
	#[inline]
	pub fn raw(self) -> libc::c_int {
		match self {
			SockType::Stream => libc::SOCK_STREAM,
			SockType::Datagram => libc::SOCK_DGRAM,
		}
	}

	/// Maps a `SOCK_*` constant (as reported by SO_TYPE) back to a type.
	pub fn from_raw(sock_type: libc::c_int) -> std::io::Result<Self> {
		match sock_type {
			libc::SOCK_STREAM => Ok(SockType::Stream),
			libc::SOCK_DGRAM => Ok(SockType::Datagram),
			_ => Err(SocketError::UnsupportedType { sock_type }.into()),
		}
	}

	/// Connection-oriented types need `listen()` after bind.
	#[inline]
	pub fn is_connection_oriented(self) -> bool {
		self == SockType::Stream
	}
}

/// Protocol passed as the third `socket()` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
	/// Let the kernel pick (0).
	#[default]
	Default,
	Tcp,
	Udp,
	Mptcp,
}

impl Protocol {
	#[inline]
	pub fn raw(self) -> libc::c_int {
		match self {
			Protocol::Default => 0,
			Protocol::Tcp => libc::IPPROTO_TCP,
			Protocol::Udp => libc::IPPROTO_UDP,
			Protocol::Mptcp => IPPROTO_MPTCP,
		}
	}
}
