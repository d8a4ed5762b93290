mod common;

use std::collections::HashSet;
use nethelpers::{
	Family, ServerOpts, SockType, free_fds, get_sock_type, get_socket_local_port, make_sockaddr,
	raw_errno, start_mptcp_server, start_reuseport_server, start_server, start_server_addr,
};
use rstest::rstest;
use common::{family_available, init_logging, loopback};

#[rstest]
#[case(Family::Inet, SockType::Stream)]
#[case(Family::Inet, SockType::Datagram)]
#[case(Family::Inet6, SockType::Stream)]
#[case(Family::Inet6, SockType::Datagram)]
fn ephemeral_port_is_resolved(#[case] family: Family, #[case] sock_type: SockType) {
	init_logging();
	if !family_available(family) {
		return;
	}

	let server = start_server(family, sock_type, Some(loopback(family)), 0, 0).unwrap();
	assert_ne!(get_socket_local_port(&server).unwrap(), 0);
	assert_eq!(get_sock_type(&server).unwrap(), sock_type);

	let local = server.local_addr().unwrap();
	assert_eq!(local.family(), family);
	assert!(local.to_std().ip().is_loopback());
}

#[test]
fn stream_server_is_listening() {
	init_logging();
	let server = start_server(Family::Inet, SockType::Stream, Some("127.0.0.1"), 0, 0).unwrap();

	let mut accepting: libc::c_int = 0;
	let mut len = std::mem::size_of::<libc::c_int>() as libc::socklen_t;
	let rc = unsafe {
		libc::getsockopt(
			server.as_raw_fd(),
			libc::SOL_SOCKET,
			libc::SO_ACCEPTCONN,
			&mut accepting as *mut _ as *mut libc::c_void,
			&mut len,
		)
	};
	assert_eq!(rc, 0);
	assert_eq!(accepting, 1);
}

#[test]
fn timeout_is_applied_to_server() {
	init_logging();
	let server = start_server(Family::Inet, SockType::Datagram, Some("127.0.0.1"), 0, 1500).unwrap();

	let mut tv: libc::timeval = unsafe { std::mem::zeroed() };
	let mut len = std::mem::size_of::<libc::timeval>() as libc::socklen_t;
	let rc = unsafe {
		libc::getsockopt(
			server.as_raw_fd(),
			libc::SOL_SOCKET,
			libc::SO_RCVTIMEO,
			&mut tv as *mut _ as *mut libc::c_void,
			&mut len,
		)
	};
	assert_eq!(rc, 0);
	assert_eq!((tv.tv_sec, tv.tv_usec), (1, 500_000));
}

#[test]
fn bind_conflict_keeps_errno() {
	init_logging();
	let first = start_server(Family::Inet, SockType::Stream, Some("127.0.0.1"), 0, 0).unwrap();
	let port = get_socket_local_port(&first).unwrap();

	let err = start_server(Family::Inet, SockType::Stream, Some("127.0.0.1"), port, 0).unwrap_err();
	assert_eq!(raw_errno(&err), libc::EADDRINUSE);
	assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);
}

#[test]
fn invalid_address_fails_before_socket() {
	init_logging();
	let err = start_server(Family::Inet, SockType::Stream, Some("not-an-ip"), 0, 0).unwrap_err();
	assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}

#[test]
fn reuseport_opt_allows_shared_bind() {
	init_logging();
	let addr = make_sockaddr(Family::Inet, Some("127.0.0.1"), 0).unwrap();
	let opts = ServerOpts::new().reuseport(true);
	let first = start_server_addr(SockType::Datagram, &addr, &opts).unwrap();
	let bound = first.local_addr().unwrap();
	let second = start_server_addr(SockType::Datagram, &bound, &opts).unwrap();
	assert_eq!(second.local_addr().unwrap(), bound);
}

#[rstest]
#[case(SockType::Stream, 1)]
#[case(SockType::Stream, 4)]
#[case(SockType::Datagram, 3)]
fn reuseport_group_shares_one_port(#[case] sock_type: SockType, #[case] count: usize) {
	init_logging();
	let fds = start_reuseport_server(Family::Inet, sock_type, Some("127.0.0.1"), 0, 0, count).unwrap();
	assert_eq!(fds.len(), count);

	let raw: HashSet<_> = fds.iter().map(|s| s.as_raw_fd()).collect();
	assert_eq!(raw.len(), count);

	let ports: HashSet<_> = fds.iter().map(|s| get_socket_local_port(s).unwrap()).collect();
	assert_eq!(ports.len(), 1);
	assert!(!ports.contains(&0));

	assert!(free_fds(Some(fds), count).is_empty());
}

#[test]
fn reuseport_group_fails_whole_on_conflict() {
	init_logging();
	let plain = start_server(Family::Inet, SockType::Stream, Some("127.0.0.1"), 0, 0).unwrap();
	let port = get_socket_local_port(&plain).unwrap();

	let err = start_reuseport_server(Family::Inet, SockType::Stream, Some("127.0.0.1"), port, 0, 3)
		.unwrap_err();
	assert_eq!(raw_errno(&err), libc::EADDRINUSE);
}

#[test]
fn mptcp_server_or_unsupported() {
	init_logging();
	match start_mptcp_server(Family::Inet, Some("127.0.0.1"), 0, 0) {
		Ok(server) => assert_eq!(get_sock_type(&server).unwrap(), SockType::Stream),
		Err(e) => assert!(
			matches!(raw_errno(&e), libc::EPROTONOSUPPORT | libc::EINVAL | libc::ENOPROTOOPT),
			"unexpected error: {}",
			e
		),
	}
}
