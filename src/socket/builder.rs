use super::Protocol;

// ============================================================================
// Server Options
// ============================================================================

/// How a server socket is set up before bind.
///
/// # Example
/// ```ignore
/// use nethelpers::{make_sockaddr, start_server_addr, Family, ServerOpts, SockType};
///
/// let addr = make_sockaddr(Family::Inet, Some("127.0.0.1"), 0)?;
/// let server = start_server_addr(SockType::Stream, &addr, &ServerOpts::new().timeout_ms(500))?;
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerOpts {
	/// SO_RCVTIMEO/SO_SNDTIMEO in milliseconds. 0 means the default.
	pub timeout_ms: u32,
	pub reuseport: bool,
	pub protocol: Protocol,
}

impl ServerOpts {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn timeout_ms(mut self, timeout_ms: u32) -> Self {
		self.timeout_ms = timeout_ms;
		self
	}

	pub fn reuseport(mut self, enable: bool) -> Self {
		self.reuseport = enable;
		self
	}

	pub fn protocol(mut self, protocol: Protocol) -> Self {
		self.protocol = protocol;
		self
	}
}

// ============================================================================
// Connect Options
// ============================================================================

/// How a client socket is set up before connect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectOpts {
	pub timeout_ms: u32,
	pub protocol: Protocol,
}

impl ConnectOpts {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn timeout_ms(mut self, timeout_ms: u32) -> Self {
		self.timeout_ms = timeout_ms;
		self
	}

	pub fn protocol(mut self, protocol: Protocol) -> Self {
		self.protocol = protocol;
		self
	}
}
