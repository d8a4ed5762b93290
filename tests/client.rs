mod common;

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream, UdpSocket};
use std::os::fd::OwnedFd;
use nethelpers::{
	ConnectOpts, Family, Protocol, SockType, Socket, connect_fd_to_fd, connect_to_addr, connect_to_fd,
	connect_to_mptcp_fd, fastopen_connect, get_sock_type, make_sockaddr, raw_errno,
	set_tcp_fastopen, start_mptcp_server, start_server,
};
use rstest::rstest;
use common::{family_available, init_logging, loopback};

#[rstest]
#[case(Family::Inet)]
#[case(Family::Inet6)]
fn stream_client_reaches_server(#[case] family: Family) {
	init_logging();
	if !family_available(family) {
		return;
	}

	let server = start_server(family, SockType::Stream, Some(loopback(family)), 0, 0).unwrap();
	let client = connect_to_fd(&server, 0).unwrap();
	assert_eq!(client.local_addr().unwrap().family(), family);

	let listener = TcpListener::from(OwnedFd::from(server));
	let (mut accepted, _) = listener.accept().unwrap();

	let mut client = TcpStream::from(OwnedFd::from(client));
	client.write_all(b"ping").unwrap();
	let mut buf = [0u8; 4];
	accepted.read_exact(&mut buf).unwrap();
	assert_eq!(&buf, b"ping");
}

#[test]
fn datagram_client_follows_server_type() {
	init_logging();
	let server = start_server(Family::Inet, SockType::Datagram, Some("127.0.0.1"), 0, 0).unwrap();
	let client = connect_to_fd(&server, 0).unwrap();
	assert_eq!(get_sock_type(&client).unwrap(), SockType::Datagram);

	let client = UdpSocket::from(OwnedFd::from(client));
	let server = UdpSocket::from(OwnedFd::from(server));
	client.send(b"dgram").unwrap();
	let mut buf = [0u8; 16];
	let (n, from) = server.recv_from(&mut buf).unwrap();
	assert_eq!(&buf[..n], b"dgram");
	assert_eq!(from, client.local_addr().unwrap());
}

#[test]
fn existing_client_connects_to_server() {
	init_logging();
	let server = start_server(Family::Inet, SockType::Stream, Some("127.0.0.1"), 0, 0).unwrap();
	let client = Socket::new(Family::Inet, SockType::Stream, Protocol::Default).unwrap();

	connect_fd_to_fd(&client, &server, 250).unwrap();

	let peer = unsafe {
		let (mut storage, mut len): (libc::sockaddr_storage, libc::socklen_t) =
			(std::mem::zeroed(), std::mem::size_of::<libc::sockaddr_storage>() as _);
		let rc = libc::getpeername(client.as_raw_fd(), &mut storage as *mut _ as *mut libc::sockaddr, &mut len);
		assert_eq!(rc, 0);
		u16::from_be((*(&storage as *const _ as *const libc::sockaddr_in)).sin_port)
	};
	assert_eq!(peer, server.local_addr().unwrap().port());
}

#[test]
fn refused_connect_keeps_errno() {
	init_logging();
	let server = start_server(Family::Inet, SockType::Stream, Some("127.0.0.1"), 0, 0).unwrap();
	let addr = server.local_addr().unwrap();
	drop(server);

	let err = connect_to_addr(SockType::Stream, &addr, &ConnectOpts::new()).unwrap_err();
	assert_eq!(raw_errno(&err), libc::ECONNREFUSED);
	assert_eq!(err.kind(), std::io::ErrorKind::ConnectionRefused);
}

#[test]
fn connect_to_unbound_target_fails() {
	init_logging();
	let bogus = Socket::new(Family::Inet, SockType::Stream, Protocol::Default).unwrap();
	let any = make_sockaddr(Family::Inet, None, 0).unwrap();
	assert_eq!(bogus.local_addr().unwrap(), any);
	assert!(connect_to_fd(&bogus, 100).is_err());
}

#[test]
fn fastopen_delivers_payload() {
	init_logging();
	let server = start_server(Family::Inet, SockType::Stream, Some("127.0.0.1"), 0, 0).unwrap();
	set_tcp_fastopen(&server, 5).unwrap();

	let client = match fastopen_connect(&server, b"hello", 0) {
		Ok(client) => client,
		// Client side TFO disabled via net.ipv4.tcp_fastopen.
		Err(e) if raw_errno(&e) == libc::EOPNOTSUPP => return,
		Err(e) => panic!("fastopen_connect failed: {}", e),
	};

	let listener = TcpListener::from(OwnedFd::from(server));
	let (mut accepted, _) = listener.accept().unwrap();
	let mut buf = [0u8; 5];
	accepted.read_exact(&mut buf).unwrap();
	assert_eq!(&buf, b"hello");
	drop(client);
}

#[test]
fn fastopen_to_closed_port_fails() {
	init_logging();
	let server = start_server(Family::Inet, SockType::Datagram, Some("127.0.0.1"), 0, 0).unwrap();
	assert!(fastopen_connect(&server, b"payload", 200).is_err());
}

#[test]
fn mptcp_client_or_unsupported() {
	init_logging();
	let Ok(server) = start_mptcp_server(Family::Inet, Some("127.0.0.1"), 0, 0) else {
		return;
	};
	let client = connect_to_mptcp_fd(&server, 0).unwrap();
	assert_eq!(get_sock_type(&client).unwrap(), SockType::Stream);
}
