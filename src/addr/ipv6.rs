/// IPv6 socket address (IP + port + scope), host byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketAddrV6 {
	ip: [u8; 16],
	port: u16,
	/// Scope ID for link-local addresses (identifies network interface).
	scope_id: u32,
}

impl SocketAddrV6 {
	/// Creates a new IPv6 address.
	pub fn new(ip: [u8; 16], port: u16) -> Self {
		Self { ip, port, scope_id: 0 }
	}

	/// Creates with explicit scope ID.
	///
	/// Use for link-local addresses (fe80::) where you need to specify the interface.
	pub fn with_scope(ip: [u8; 16], port: u16, scope_id: u32) -> Self {
		Self { ip, port, scope_id }
	}

	/// Returns the IP bytes.
	pub fn ip(&self) -> [u8; 16] {
		self.ip
	}

	/// Returns the port.
	pub fn port(&self) -> u16 {
		self.port
	}

	/// Returns the scope ID.
	pub fn scope_id(&self) -> u32 {
		self.scope_id
	}

	/// Converts to the raw sockaddr_in6 for syscalls.
	pub(crate) fn to_raw(&self) -> libc::sockaddr_in6 {
		let mut raw: libc::sockaddr_in6 = unsafe { std::mem::zeroed() };
		raw.sin6_family = libc::AF_INET6 as libc::sa_family_t;
		raw.sin6_port = self.port.to_be();
		raw.sin6_addr = libc::in6_addr { s6_addr: self.ip };
		raw.sin6_scope_id = self.scope_id;
		raw
	}

	/// Creates from raw sockaddr_in6.
	pub(crate) fn from_raw(raw: &libc::sockaddr_in6) -> Self {
		Self {
			ip: raw.sin6_addr.s6_addr,
			port: u16::from_be(raw.sin6_port),
			scope_id: raw.sin6_scope_id,
		}
	}
}
