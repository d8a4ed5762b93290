use std::os::fd::AsRawFd;
use crate::addr::SockAddr;
use crate::error::{SocketError, errno, log_err};
use super::raw::{connect_raw, local_addr_raw};
use super::{ConnectOpts, Protocol, SockType, Socket, get_sock_type, settimeo};

fn server_addr<S: AsRawFd>(server: &S) -> std::io::Result<SockAddr> {
	local_addr_raw(server.as_raw_fd()).inspect_err(|_| {
		log_err!("Failed to get server addr");
	})
}

/// Creates a socket for `addr`'s family, applies the timeout and connects.
pub fn connect_to_addr(sock_type: SockType, addr: &SockAddr, opts: &ConnectOpts) -> std::io::Result<Socket> {
	let socket = Socket::new(addr.family(), sock_type, opts.protocol).inspect_err(|_| {
		log_err!("Failed to create client socket");
	})?;

	settimeo(&socket, opts.timeout_ms)?;
	socket.connect(addr)?;

	tracing::debug!(fd = socket.as_raw_fd(), %addr, "client connected");
	Ok(socket)
}

/// Connects a new socket to the address `server` is bound to.
///
/// The client takes the server's socket type and address family; `protocol`
/// picks between plain TCP/UDP and MPTCP.
pub fn connect_to_fd_proto<S: AsRawFd>(server: &S, protocol: Protocol, timeout_ms: u32) -> std::io::Result<Socket> {
	let sock_type = get_sock_type(server)?;
	let addr = server_addr(server)?;
	let opts = ConnectOpts::new().timeout_ms(timeout_ms).protocol(protocol);
	connect_to_addr(sock_type, &addr, &opts)
}

/// Connects a new socket to `server`'s bound address.
pub fn connect_to_fd<S: AsRawFd>(server: &S, timeout_ms: u32) -> std::io::Result<Socket> {
	connect_to_fd_proto(server, Protocol::Default, timeout_ms)
}

/// Connects a new MPTCP socket to `server`'s bound address.
pub fn connect_to_mptcp_fd<S: AsRawFd>(server: &S, timeout_ms: u32) -> std::io::Result<Socket> {
	connect_to_fd_proto(server, Protocol::Mptcp, timeout_ms)
}

/// Opens a stream to `server` carrying `data` in the SYN (TCP Fast Open).
///
/// Fails unless the kernel accepts exactly `data.len()` bytes.
pub fn fastopen_connect<S: AsRawFd>(server: &S, data: &[u8], timeout_ms: u32) -> std::io::Result<Socket> {
	let addr = server_addr(server)?;

	let socket = Socket::new(addr.family(), SockType::Stream, Protocol::Default).inspect_err(|_| {
		log_err!("Failed to create client socket");
	})?;

	settimeo(&socket, timeout_ms)?;

	let sent = socket.send_fastopen(data, &addr);
	check_fastopen_sent(sent, data.len(), errno()).inspect_err(|_| {
		log_err!("sendto(data, {}) != {}", data.len(), sent);
	})?;

	Ok(socket)
}

/// Accepts only a full send. errno is recorded only when sendto failed;
/// a short but successful send leaves it stale.
fn check_fastopen_sent(sent: isize, expected: usize, errno: i32) -> Result<(), SocketError> {
	if sent >= 0 && sent as usize == expected {
		return Ok(());
	}
	let errno = if sent < 0 { errno } else { 0 };
	Err(SocketError::FastOpenShort { errno, expected, sent })
}

/// Connects an existing `client` to the address `server` is bound to.
///
/// The timeout is applied to `client` first. `client` stays owned by the
/// caller whatever the outcome.
pub fn connect_fd_to_fd<C: AsRawFd, S: AsRawFd>(client: &C, server: &S, timeout_ms: u32) -> std::io::Result<()> {
	settimeo(client, timeout_ms)?;
	let addr = server_addr(server)?;
	connect_raw(client.as_raw_fd(), &addr)
}
