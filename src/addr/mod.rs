//! Address families and the generic socket address.
//!
//! Two families are supported:
//! - `Inet`  — Internet Protocol version 4
//! - `Inet6` — Internet Protocol version 6

mod ipv4;
mod ipv6;
pub use self::ipv4::SocketAddrV4;
pub use self::ipv6::SocketAddrV6;

use crate::error::{SocketError, log_err};

/// Address family of a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
	Inet,
	Inet6,
}

impl Family {
	/// Returns the libc constant for this address family.
	#[inline]
	pub fn raw(self) -> libc::c_int {
		match self {
			Family::Inet => libc::AF_INET,
			Family::Inet6 => libc::AF_INET6,
		}
	}

	/// Maps an `AF_*` constant back to a family.
	pub fn from_raw(family: libc::c_int) -> std::io::Result<Self> {
		match family {
			libc::AF_INET => Ok(Family::Inet),
			libc::AF_INET6 => Ok(Family::Inet6),
			_ => Err(SocketError::UnsupportedFamily { family }.into()),
		}
	}

	/// Size of the concrete sockaddr structure for this family.
	#[inline]
	pub fn addr_len(self) -> libc::socklen_t {
		let len = match self {
			Family::Inet => std::mem::size_of::<libc::sockaddr_in>(),
			Family::Inet6 => std::mem::size_of::<libc::sockaddr_in6>(),
		};
		len as libc::socklen_t
	}
}

/// A socket address stored in a `sockaddr_storage`.
///
/// Large enough for either family. `len` is the size of the concrete
/// structure and is what gets passed to bind/connect/sendto.
#[derive(Clone, Copy)]
pub struct SockAddr {
	storage: libc::sockaddr_storage,
	len: libc::socklen_t,
}

impl SockAddr {
	/// Wraps raw storage filled in by the kernel (getsockname and friends).
	///
	/// Fails if the family is not IPv4/IPv6 or `len` is too short for it.
	pub(crate) fn from_storage(storage: libc::sockaddr_storage, len: libc::socklen_t) -> std::io::Result<Self> {
		let family = Family::from_raw(storage.ss_family as libc::c_int)?;
		if len < family.addr_len() {
			return Err(SocketError::InvalidAddress {
				reason: format!("sockaddr too short for {:?}: {} bytes", family, len),
			}.into());
		}
		Ok(Self { storage, len: family.addr_len() })
	}

	/// Returns an all-zero storage and its capacity, for the kernel to fill.
	pub(crate) fn empty_storage() -> (libc::sockaddr_storage, libc::socklen_t) {
		let storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
		(storage, std::mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t)
	}

	/// Returns the family.
	pub fn family(&self) -> Family {
		// from_storage and the From impls only accept the two families
		if self.storage.ss_family as libc::c_int == libc::AF_INET6 {
			Family::Inet6
		} else {
			Family::Inet
		}
	}

	/// Length of the concrete sockaddr structure.
	#[inline]
	pub fn socklen(&self) -> libc::socklen_t {
		self.len
	}

	/// Port in host byte order.
	pub fn port(&self) -> u16 {
		match self.family() {
			Family::Inet => self.as_v4().map(|a| a.port()).unwrap_or(0),
			Family::Inet6 => self.as_v6().map(|a| a.port()).unwrap_or(0),
		}
	}

	/// Port exactly as stored, in network byte order.
	pub fn port_be(&self) -> u16 {
		self.port().to_be()
	}

	/// Typed IPv4 view, if this is an IPv4 address.
	pub fn as_v4(&self) -> Option<SocketAddrV4> {
		if self.family() != Family::Inet {
			return None;
		}
		let raw = unsafe { &*(&self.storage as *const _ as *const libc::sockaddr_in) };
		Some(SocketAddrV4::from_raw(raw))
	}

	/// Typed IPv6 view, if this is an IPv6 address.
	pub fn as_v6(&self) -> Option<SocketAddrV6> {
		if self.family() != Family::Inet6 {
			return None;
		}
		let raw = unsafe { &*(&self.storage as *const _ as *const libc::sockaddr_in6) };
		Some(SocketAddrV6::from_raw(raw))
	}

	/// Pointer for syscalls. Valid for as long as `self` is borrowed.
	#[inline]
	pub fn as_ptr(&self) -> *const libc::sockaddr {
		&self.storage as *const _ as *const libc::sockaddr
	}

	/// Converts to the std representation.
	pub fn to_std(&self) -> std::net::SocketAddr {
		match (self.as_v4(), self.as_v6()) {
			(Some(v4), _) => std::net::SocketAddr::V4(std::net::SocketAddrV4::new(v4.ip().into(), v4.port())),
			(_, Some(v6)) => std::net::SocketAddr::V6(std::net::SocketAddrV6::new(
				v6.ip().into(),
				v6.port(),
				0,
				v6.scope_id(),
			)),
			_ => unreachable!("SockAddr always holds an IPv4 or IPv6 address"),
		}
	}
}

impl From<SocketAddrV4> for SockAddr {
	fn from(addr: SocketAddrV4) -> Self {
		let (mut storage, _) = Self::empty_storage();
		let raw = addr.to_raw();
		unsafe {
			std::ptr::write(&mut storage as *mut _ as *mut libc::sockaddr_in, raw);
		}
		Self { storage, len: Family::Inet.addr_len() }
	}
}

impl From<SocketAddrV6> for SockAddr {
	fn from(addr: SocketAddrV6) -> Self {
		let (mut storage, _) = Self::empty_storage();
		let raw = addr.to_raw();
		unsafe {
			std::ptr::write(&mut storage as *mut _ as *mut libc::sockaddr_in6, raw);
		}
		Self { storage, len: Family::Inet6.addr_len() }
	}
}

impl From<std::net::SocketAddr> for SockAddr {
	fn from(addr: std::net::SocketAddr) -> Self {
		match addr {
			std::net::SocketAddr::V4(a) => SocketAddrV4::new(a.ip().octets(), a.port()).into(),
			std::net::SocketAddr::V6(a) => {
				SocketAddrV6::with_scope(a.ip().octets(), a.port(), a.scope_id()).into()
			}
		}
	}
}

impl std::fmt::Debug for SockAddr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.to_std())
	}
}

impl std::fmt::Display for SockAddr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.to_std())
	}
}

impl PartialEq for SockAddr {
	fn eq(&self, other: &Self) -> bool {
		self.len == other.len && self.to_std() == other.to_std()
	}
}

impl Eq for SockAddr {}

/// Builds a socket address from a family, optional text address and port.
///
/// `None` leaves the address unspecified (any). The text must be a literal
/// of the requested family; names are not resolved.
pub fn make_sockaddr(family: Family, addr_str: Option<&str>, port: u16) -> std::io::Result<SockAddr> {
	match family {
		Family::Inet => {
			let ip = match addr_str {
				Some(s) => match s.parse::<std::net::Ipv4Addr>() {
					Ok(ip) => ip.octets(),
					Err(_) => {
						log_err!("inet_pton(AF_INET, {})", s);
						return Err(SocketError::InvalidAddress {
							reason: format!("not an IPv4 literal: {:?}", s),
						}.into());
					}
				},
				None => [0; 4],
			};
			Ok(SocketAddrV4::new(ip, port).into())
		}
		Family::Inet6 => {
			let ip = match addr_str {
				Some(s) => match s.parse::<std::net::Ipv6Addr>() {
					Ok(ip) => ip.octets(),
					Err(_) => {
						log_err!("inet_pton(AF_INET6, {})", s);
						return Err(SocketError::InvalidAddress {
							reason: format!("not an IPv6 literal: {:?}", s),
						}.into());
					}
				},
				None => [0; 16],
			};
			Ok(SocketAddrV6::new(ip, port).into())
		}
	}
}

/// Same as [`make_sockaddr`] but takes a raw `AF_*` constant.
pub fn make_sockaddr_raw(family: libc::c_int, addr_str: Option<&str>, port: u16) -> std::io::Result<SockAddr> {
	let family = Family::from_raw(family).inspect_err(|_| {
		log_err!("unsupported address family {}", family);
	})?;
	make_sockaddr(family, addr_str, port)
}
