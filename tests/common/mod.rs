#![allow(dead_code)]

use nethelpers::{Family, Socket, SockType, Protocol, make_sockaddr};

/// Routes library log events to the test harness output.
pub fn init_logging() {
	let _ = tracing_subscriber::fmt()
		.with_max_level(tracing::Level::DEBUG)
		.with_test_writer()
		.try_init();
}

/// Loopback literal for a family.
pub fn loopback(family: Family) -> &'static str {
	match family {
		Family::Inet => "127.0.0.1",
		Family::Inet6 => "::1",
	}
}

/// Some CI sandboxes run without an IPv6 loopback.
pub fn family_available(family: Family) -> bool {
	let Ok(socket) = Socket::new(family, SockType::Datagram, Protocol::Default) else {
		return false;
	};
	let Ok(addr) = make_sockaddr(family, Some(loopback(family)), 0) else {
		return false;
	};
	socket.bind(&addr).is_ok()
}
