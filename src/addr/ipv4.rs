/// IPv4 socket address (IP + port), host byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketAddrV4 {
	ip: [u8; 4],
	port: u16,
}

impl SocketAddrV4 {
	/// Creates a new IPv4 address.
	pub fn new(ip: [u8; 4], port: u16) -> Self {
		Self { ip, port }
	}

	/// Creates from raw sockaddr_in.
	pub(crate) fn from_raw(raw: &libc::sockaddr_in) -> Self {
		Self {
			ip: raw.sin_addr.s_addr.to_ne_bytes(),
			port: u16::from_be(raw.sin_port),
		}
	}

	/// Returns the IP bytes.
	pub fn ip(&self) -> [u8; 4] {
		self.ip
	}

	/// Returns the port.
	pub fn port(&self) -> u16 {
		self.port
	}

	/// Converts to the raw sockaddr_in for syscalls.
	///
	/// Port goes out big-endian; `s_addr` keeps the octets in wire order.
	pub(crate) fn to_raw(&self) -> libc::sockaddr_in {
		libc::sockaddr_in {
			sin_family: libc::AF_INET as libc::sa_family_t,
			sin_port: self.port.to_be(),
			sin_addr: libc::in_addr {
				s_addr: u32::from_ne_bytes(self.ip),
			},
			sin_zero: [0; 8],
		}
	}
}
