use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddrV4};
use std::time::{Duration, Instant};

use pnet_packet::ipv4::Ipv4Packet;
use pnet_packet::Packet;
use socket2::{Domain, Protocol, SockAddr, Type};

use super::Identifier;

// Kernel receive buffer requested at open.
const RECV_BUFFER_SIZE: usize = 50 * 1024;

/// Flavor of the underlying ICMP socket.
///
/// `Raw` requires the privilege to open raw sockets. `Dgram` works
/// unprivileged on kernels where `net.ipv4.ping_group_range` admits the
/// caller; there the kernel stamps outgoing requests with the bound port as
/// the echo identifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SocketType {
    Raw,
    Dgram,
}

/// Transport seam.
///
/// `recv_from` hands back bare ICMP bytes (any leading IP header already
/// stripped) together with the sender address; `Ok(None)` means the bounded
/// wait timed out without data.
pub(crate) trait Socket: Sized {
    fn open(socket_type: SocketType, identifier: Identifier) -> io::Result<Self>;
    fn send_to(&self, buf: &[u8], addr: &SockAddr) -> io::Result<usize>;
    fn recv_from(&self, buf: &mut [u8], timeout: Duration) -> io::Result<Option<(usize, IpAddr)>>;
}

/// ICMP socket over `socket2`. Closed once on drop; the owning session keeps
/// it in an `Option`, which makes explicit teardown idempotent.
pub(crate) struct IcmpSocket {
    socket: socket2::Socket,
    socket_type: SocketType,
}

impl Socket for IcmpSocket {
    fn open(socket_type: SocketType, identifier: Identifier) -> io::Result<IcmpSocket> {
        let type_ = match socket_type {
            SocketType::Raw => Type::RAW,
            SocketType::Dgram => Type::DGRAM,
        };
        let socket = socket2::Socket::new(Domain::IPV4, type_, Some(Protocol::ICMPV4))?;
        socket.set_recv_buffer_size(RECV_BUFFER_SIZE)?;
        if socket_type == SocketType::Dgram {
            // Bind the local "port" to the session identifier so the kernel
            // stamps our echo requests with it.
            let local = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, identifier.into());
            socket.bind(&local.into())?;
        }
        tracing::trace!(?socket_type, "opened ICMP socket");
        Ok(IcmpSocket { socket, socket_type })
    }

    fn send_to(&self, buf: &[u8], addr: &SockAddr) -> io::Result<usize> {
        self.socket.send_to(buf, addr)
    }

    fn recv_from(&self, buf: &mut [u8], timeout: Duration) -> io::Result<Option<(usize, IpAddr)>> {
        // The deadline is computed once per wait; an interrupted wait resumes
        // with the remaining budget only, so repeated signal delivery cannot
        // extend the wait beyond `timeout`.
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            // A sub-microsecond timeout would be truncated to zero by the
            // socket option, which means "block forever".
            self.socket.set_read_timeout(Some(remaining.max(Duration::from_micros(1))))?;

            let mut recv_buf = [0u8; 4096];
            // Socket2 gives a safety guaranty which allows us to do an unsafe cast from `&mut [u8]`
            // to `&mut [std::mem::MaybeUninit<u8>]`. In fact, even if we use MaybeUninit here we have
            // to use unsafe somewhere to copy the data out of MaybeUninit.
            // https://docs.rs/socket2/0.4.7/socket2/struct.Socket.html#method.recv
            let recv_result = self.socket.recv_from(unsafe {
                &mut *(std::ptr::addr_of_mut!(recv_buf) as *mut [u8]
                    as *mut [std::mem::MaybeUninit<u8>])
            });
            match recv_result {
                Ok((n, socket_addr)) => {
                    let ip = socket_addr
                        .as_socket_ipv4()
                        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |sa| IpAddr::V4(*sa.ip()));
                    let n_copied = match self.socket_type {
                        SocketType::Raw => {
                            // On a RAW socket we get a whole IP packet; hand
                            // back only the ICMP content.
                            match Ipv4Packet::new(&recv_buf[..n]) {
                                Some(ipv4_packet) => {
                                    let ip_payload = ipv4_packet.payload();
                                    let len = ip_payload.len().min(buf.len());
                                    buf[..len].copy_from_slice(&ip_payload[..len]);
                                    len
                                }
                                None => 0,
                            }
                        }
                        SocketType::Dgram => {
                            let len = n.min(buf.len());
                            buf[..len].copy_from_slice(&recv_buf[..len]);
                            len
                        }
                    };
                    return Ok(Some((n_copied, ip)));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e)
                    if e.kind() == io::ErrorKind::WouldBlock
                        || e.kind() == io::ErrorKind::TimedOut =>
                {
                    return Ok(None);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
