//! Pre-filled Ethernet/IP/TCP frames used as raw packet fixtures.
//!
//! Only a handful of fields are set; everything else is zero. Fields are kept
//! in host order in the structs and laid out on the wire by `to_bytes`.

/// IP total length (v4) / payload length (v6) and TCP urgent pointer value.
pub const MAGIC_BYTES: u16 = 123;

pub const ETH_P_IP: u16 = 0x0800;
pub const ETH_P_IPV6: u16 = 0x86DD;
pub const ETH_HLEN: usize = 14;
pub const IPV4_HLEN: usize = 20;
pub const IPV6_HLEN: usize = 40;
pub const TCP_HLEN: usize = 20;
pub const PKT_V4_LEN: usize = ETH_HLEN + IPV4_HLEN + TCP_HLEN;
pub const PKT_V6_LEN: usize = ETH_HLEN + IPV6_HLEN + TCP_HLEN;

/// Ethernet II header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthHdr {
	pub dest: [u8; 6],
	pub source: [u8; 6],
	pub proto: u16,
}

impl EthHdr {
	pub const fn new(proto: u16) -> Self {
		Self { dest: [0; 6], source: [0; 6], proto }
	}

	fn write(&self, out: &mut [u8]) {
		out[0..6].copy_from_slice(&self.dest);
		out[6..12].copy_from_slice(&self.source);
		out[12..14].copy_from_slice(&self.proto.to_be_bytes());
	}
}

/// IPv4 header without options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Hdr {
	pub version: u8,
	/// Header length in 32-bit words.
	pub ihl: u8,
	pub tos: u8,
	pub tot_len: u16,
	pub id: u16,
	pub frag_off: u16,
	pub ttl: u8,
	pub protocol: u8,
	pub check: u16,
	pub saddr: [u8; 4],
	pub daddr: [u8; 4],
}

impl Ipv4Hdr {
	fn write(&self, out: &mut [u8]) {
		out[0] = (self.version << 4) | (self.ihl & 0x0f);
		out[1] = self.tos;
		out[2..4].copy_from_slice(&self.tot_len.to_be_bytes());
		out[4..6].copy_from_slice(&self.id.to_be_bytes());
		out[6..8].copy_from_slice(&self.frag_off.to_be_bytes());
		out[8] = self.ttl;
		out[9] = self.protocol;
		out[10..12].copy_from_slice(&self.check.to_be_bytes());
		out[12..16].copy_from_slice(&self.saddr);
		out[16..20].copy_from_slice(&self.daddr);
	}
}

/// IPv6 fixed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Hdr {
	pub version: u8,
	pub priority: u8,
	pub flow_lbl: [u8; 3],
	pub payload_len: u16,
	pub nexthdr: u8,
	pub hop_limit: u8,
	pub saddr: [u8; 16],
	pub daddr: [u8; 16],
}

impl Ipv6Hdr {
	fn write(&self, out: &mut [u8]) {
		out[0] = (self.version << 4) | (self.priority & 0x0f);
		out[1..4].copy_from_slice(&self.flow_lbl);
		out[4..6].copy_from_slice(&self.payload_len.to_be_bytes());
		out[6] = self.nexthdr;
		out[7] = self.hop_limit;
		out[8..24].copy_from_slice(&self.saddr);
		out[24..40].copy_from_slice(&self.daddr);
	}
}

/// TCP header without options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpHdr {
	pub source: u16,
	pub dest: u16,
	pub seq: u32,
	pub ack_seq: u32,
	/// Data offset in 32-bit words.
	pub doff: u8,
	/// FIN..CWR, bit 0 is FIN.
	pub flags: u8,
	pub window: u16,
	pub check: u16,
	pub urg_ptr: u16,
}

impl TcpHdr {
	fn write(&self, out: &mut [u8]) {
		out[0..2].copy_from_slice(&self.source.to_be_bytes());
		out[2..4].copy_from_slice(&self.dest.to_be_bytes());
		out[4..8].copy_from_slice(&self.seq.to_be_bytes());
		out[8..12].copy_from_slice(&self.ack_seq.to_be_bytes());
		out[12] = self.doff << 4;
		out[13] = self.flags;
		out[14..16].copy_from_slice(&self.window.to_be_bytes());
		out[16..18].copy_from_slice(&self.check.to_be_bytes());
		out[18..20].copy_from_slice(&self.urg_ptr.to_be_bytes());
	}
}

const TCP_TEMPLATE: TcpHdr = TcpHdr {
	source: 0,
	dest: 0,
	seq: 0,
	ack_seq: 0,
	doff: 5,
	flags: 0,
	window: 0,
	check: 0,
	// The fixture stores 123 without a byte swap, so the wire value is
	// 123 read in the host's order.
	urg_ptr: u16::from_be_bytes(MAGIC_BYTES.to_ne_bytes()),
};

/// Ethernet + IPv4 + TCP frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Packet {
	pub eth: EthHdr,
	pub iph: Ipv4Hdr,
	pub tcp: TcpHdr,
}

impl Ipv4Packet {
	pub const LEN: usize = PKT_V4_LEN;

	pub fn to_bytes(&self) -> [u8; PKT_V4_LEN] {
		let mut out = [0u8; PKT_V4_LEN];
		self.eth.write(&mut out[..ETH_HLEN]);
		self.iph.write(&mut out[ETH_HLEN..ETH_HLEN + IPV4_HLEN]);
		self.tcp.write(&mut out[ETH_HLEN + IPV4_HLEN..]);
		out
	}
}

/// Ethernet + IPv6 + TCP frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Packet {
	pub eth: EthHdr,
	pub iph: Ipv6Hdr,
	pub tcp: TcpHdr,
}

impl Ipv6Packet {
	pub const LEN: usize = PKT_V6_LEN;

	pub fn to_bytes(&self) -> [u8; PKT_V6_LEN] {
		let mut out = [0u8; PKT_V6_LEN];
		self.eth.write(&mut out[..ETH_HLEN]);
		self.iph.write(&mut out[ETH_HLEN..ETH_HLEN + IPV6_HLEN]);
		self.tcp.write(&mut out[ETH_HLEN + IPV6_HLEN..]);
		out
	}
}

/// IPv4 TCP fixture. The IP version nibble is left at 0.
pub const PKT_V4: Ipv4Packet = Ipv4Packet {
	eth: EthHdr::new(ETH_P_IP),
	iph: Ipv4Hdr {
		version: 0,
		ihl: 5,
		tos: 0,
		tot_len: MAGIC_BYTES,
		id: 0,
		frag_off: 0,
		ttl: 0,
		protocol: libc::IPPROTO_TCP as u8,
		check: 0,
		saddr: [0; 4],
		daddr: [0; 4],
	},
	tcp: TCP_TEMPLATE,
};

/// IPv6 TCP fixture. The IP version nibble is left at 0.
pub const PKT_V6: Ipv6Packet = Ipv6Packet {
	eth: EthHdr::new(ETH_P_IPV6),
	iph: Ipv6Hdr {
		version: 0,
		priority: 0,
		flow_lbl: [0; 3],
		payload_len: MAGIC_BYTES,
		nexthdr: libc::IPPROTO_TCP as u8,
		hop_limit: 0,
		saddr: [0; 16],
		daddr: [0; 16],
	},
	tcp: TCP_TEMPLATE,
};
