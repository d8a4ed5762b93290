//! Socket setup helpers for network tests: servers on arbitrary
//! addresses, clients connected to them, reuseport listener groups and raw
//! packet fixtures.

pub mod socket;
pub mod packet;
mod addr;
mod error;

pub use self::error::{SocketError, errno, raw_errno};
pub use self::addr::{Family, SockAddr, SocketAddrV4, SocketAddrV6, make_sockaddr, make_sockaddr_raw};
pub use self::socket::{Socket, SockType, Protocol, ServerOpts, ConnectOpts, IPPROTO_MPTCP,
					   DEFAULT_TIMEOUT_MS, LISTEN_BACKLOG,
					   start_server, start_mptcp_server, start_server_proto, start_server_addr,
					   start_reuseport_server, free_fds,
					   connect_to_fd, connect_to_mptcp_fd, connect_to_fd_proto,
					   connect_fd_to_fd, connect_to_addr, fastopen_connect,
					   settimeo, set_reuse_port, set_tcp_fastopen,
					   get_sock_type, get_socket_local_port};
pub use self::packet::{PKT_V4, PKT_V6, MAGIC_BYTES, Ipv4Packet, Ipv6Packet};
