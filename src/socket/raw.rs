use std::os::fd::{AsFd, AsRawFd, FromRawFd, IntoRawFd, OwnedFd};
use crate::addr::{Family, SockAddr};
use crate::error::{SocketError, errno, log_err};
use super::{Protocol, SockType};

/// An owned IPv4/IPv6 socket descriptor.
///
/// Dropping it closes the descriptor. Every helper in this crate that
/// creates a socket hands one of these back to the caller.
#[derive(Debug)]
pub struct Socket {
	fd: OwnedFd,
}

impl Socket {
	/// Creates a new socket.
	///
	/// Calls the `socket()` syscall with the given family, type and protocol.
	/// The socket is created with `SOCK_CLOEXEC` (close on exec).
	pub fn new(family: Family, sock_type: SockType, protocol: Protocol) -> std::io::Result<Self> {
		let fd = unsafe {
			libc::socket(family.raw(), sock_type.raw() | libc::SOCK_CLOEXEC, protocol.raw())
		};
		if fd == -1 {
			return Err(SocketError::Create { errno: errno() }.into());
		}
		let fd = unsafe { OwnedFd::from_raw_fd(fd) };

		Ok(Self { fd })
	}

	/// Returns the raw file descriptor.
	///
	/// Used internally for syscalls. Does not transfer ownership.
	#[inline]
	pub fn as_raw_fd(&self) -> libc::c_int {
		self.fd.as_raw_fd()
	}

	/// Binds the socket to an address.
	pub fn bind(&self, addr: &SockAddr) -> std::io::Result<()> {
		let result = unsafe { libc::bind(self.as_raw_fd(), addr.as_ptr(), addr.socklen()) };
		if result == -1 {
			return Err(SocketError::Bind { errno: errno(), addr: addr.to_string() }.into());
		}
		Ok(())
	}

	/// Marks the socket as passive.
	pub fn listen(&self, backlog: i32) -> std::io::Result<()> {
		let result = unsafe { libc::listen(self.as_raw_fd(), backlog) };
		if result == -1 {
			return Err(SocketError::Listen { errno: errno(), backlog }.into());
		}
		Ok(())
	}

	/// Connects to a remote address. Blocks up to the send timeout.
	pub fn connect(&self, addr: &SockAddr) -> std::io::Result<()> {
		connect_raw(self.as_raw_fd(), addr)
	}

	/// Returns the address the socket is bound to.
	pub fn local_addr(&self) -> std::io::Result<SockAddr> {
		local_addr_raw(self.as_raw_fd())
	}

	/// Returns the socket type as reported by SO_TYPE.
	pub fn sock_type(&self) -> std::io::Result<SockType> {
		super::options::get_sock_type(self)
	}

	/// Sends `data` with `MSG_FASTOPEN` to `addr`, connecting in the process.
	///
	/// Returns what the kernel reported: the accepted byte count, or -1.
	pub(crate) fn send_fastopen(&self, data: &[u8], addr: &SockAddr) -> isize {
		unsafe {
			libc::sendto(
				self.as_raw_fd(),
				data.as_ptr() as *const libc::c_void,
				data.len(),
				libc::MSG_FASTOPEN,
				addr.as_ptr(),
				addr.socklen(),
			)
		}
	}
}

/// getsockname() on any descriptor.
pub(crate) fn local_addr_raw(fd: libc::c_int) -> std::io::Result<SockAddr> {
	let (mut storage, mut len) = SockAddr::empty_storage();
	let result = unsafe {
		libc::getsockname(fd, &mut storage as *mut _ as *mut libc::sockaddr, &mut len)
	};
	if result == -1 {
		return Err(SocketError::LocalAddr { errno: errno() }.into());
	}
	SockAddr::from_storage(storage, len)
}

/// connect() on any descriptor, logging on failure.
pub(crate) fn connect_raw(fd: libc::c_int, addr: &SockAddr) -> std::io::Result<()> {
	let result = unsafe { libc::connect(fd, addr.as_ptr(), addr.socklen()) };
	if result == -1 {
		let err = SocketError::Connect { errno: errno(), addr: addr.to_string() };
		log_err!("Failed to connect to server");
		return Err(err.into());
	}
	Ok(())
}

impl From<OwnedFd> for Socket {
	fn from(fd: OwnedFd) -> Self {
		Self { fd }
	}
}

impl From<Socket> for OwnedFd {
	fn from(socket: Socket) -> Self {
		socket.fd
	}
}

impl AsRawFd for Socket {
	fn as_raw_fd(&self) -> std::os::fd::RawFd {
		self.fd.as_raw_fd()
	}
}

impl AsFd for Socket {
	fn as_fd(&self) -> std::os::fd::BorrowedFd<'_> {
		self.fd.as_fd()
	}
}

impl FromRawFd for Socket {
	unsafe fn from_raw_fd(fd: std::os::fd::RawFd) -> Self {
		unsafe { Self { fd: OwnedFd::from_raw_fd(fd) } }
	}
}

impl IntoRawFd for Socket {
	fn into_raw_fd(self) -> std::os::fd::RawFd {
		self.fd.into_raw_fd()
	}
}
