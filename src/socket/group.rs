use crate::addr::{Family, make_sockaddr};
use crate::error::{SocketError, log_err};
use super::{ServerOpts, SockType, Socket, start_server_addr};

/// Starts `nr_listens` reuseport listeners sharing one address.
///
/// The first listener resolves an ephemeral port; the rest bind whatever it
/// got. Either all sockets come back or none do: on failure every listener
/// created so far is closed, newest first.
pub fn start_reuseport_server(
	family: Family,
	sock_type: SockType,
	addr_str: Option<&str>,
	port: u16,
	timeout_ms: u32,
	nr_listens: usize,
) -> std::io::Result<Vec<Socket>> {
	if nr_listens == 0 {
		return Err(SocketError::EmptyGroup.into());
	}

	let addr = make_sockaddr(family, addr_str, port)?;
	let opts = ServerOpts::new().timeout_ms(timeout_ms).reuseport(true);

	let mut fds = Vec::with_capacity(nr_listens);
	fds.push(start_server_addr(sock_type, &addr, &opts)?);

	let addr = match fds[0].local_addr() {
		Ok(addr) => addr,
		Err(e) => {
			log_err!("Failed to get server addr");
			let n = fds.len();
			free_fds(Some(fds), n);
			return Err(e);
		}
	};

	while fds.len() < nr_listens {
		match start_server_addr(sock_type, &addr, &opts) {
			Ok(socket) => fds.push(socket),
			Err(e) => {
				let n = fds.len();
				free_fds(Some(fds), n);
				return Err(e);
			}
		}
	}

	tracing::debug!(count = nr_listens, %addr, "reuseport group started");
	Ok(fds)
}

/// Closes the first `nr_close_fds` sockets of `fds`, last one first.
///
/// `nr_close_fds` is clamped to the list length. Sockets past the prefix are
/// not closed; they are handed back in their original order. `None` is a
/// no-op.
pub fn free_fds(fds: Option<Vec<Socket>>, nr_close_fds: usize) -> Vec<Socket> {
	let Some(mut fds) = fds else {
		return Vec::new();
	};

	let nr_close_fds = nr_close_fds.min(fds.len());
	let rest = fds.split_off(nr_close_fds);
	while let Some(socket) = fds.pop() {
		drop(socket);
	}
	rest
}
