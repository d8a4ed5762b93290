use crate::addr::{Family, SockAddr, make_sockaddr};
use crate::error::log_err;
use super::{Protocol, ServerOpts, SockType, Socket, set_reuse_port, settimeo};

/// Backlog passed to `listen()`.
///
/// Tests drive one connection at a time.
pub const LISTEN_BACKLOG: i32 = 1;

/// Creates, configures, binds and (for stream types) listens.
///
/// On failure the half-built socket is dropped, which closes it; the
/// returned error still carries the errno of the failing call.
pub fn start_server_addr(sock_type: SockType, addr: &SockAddr, opts: &ServerOpts) -> std::io::Result<Socket> {
	let socket = Socket::new(addr.family(), sock_type, opts.protocol).inspect_err(|_| {
		log_err!("Failed to create server socket");
	})?;

	settimeo(&socket, opts.timeout_ms)?;

	if opts.reuseport {
		set_reuse_port(&socket, true).inspect_err(|_| {
			log_err!("Failed to set SO_REUSEPORT");
		})?;
	}

	socket.bind(addr).inspect_err(|_| {
		log_err!("Failed to bind socket");
	})?;

	if sock_type.is_connection_oriented() {
		socket.listen(LISTEN_BACKLOG).inspect_err(|_| {
			log_err!("Failed to listen on socket");
		})?;
	}

	tracing::debug!(fd = socket.as_raw_fd(), ?sock_type, %addr, "server started");
	Ok(socket)
}

/// Starts a server with an explicit protocol.
pub fn start_server_proto(
	family: Family,
	sock_type: SockType,
	protocol: Protocol,
	addr_str: Option<&str>,
	port: u16,
	timeout_ms: u32,
) -> std::io::Result<Socket> {
	let addr = make_sockaddr(family, addr_str, port)?;
	let opts = ServerOpts::new().timeout_ms(timeout_ms).protocol(protocol);
	start_server_addr(sock_type, &addr, &opts)
}

/// Starts a TCP or UDP server on `addr_str:port`.
///
/// Pass port 0 for an ephemeral port and `None` to bind the any address.
pub fn start_server(
	family: Family,
	sock_type: SockType,
	addr_str: Option<&str>,
	port: u16,
	timeout_ms: u32,
) -> std::io::Result<Socket> {
	start_server_proto(family, sock_type, Protocol::Default, addr_str, port, timeout_ms)
}

/// Starts an MPTCP listener. Fails with `EPROTONOSUPPORT` on kernels without MPTCP.
pub fn start_mptcp_server(family: Family, addr_str: Option<&str>, port: u16, timeout_ms: u32) -> std::io::Result<Socket> {
	start_server_proto(family, SockType::Stream, Protocol::Mptcp, addr_str, port, timeout_ms)
}
