use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::{Duration, SystemTime};

use socket2::SockAddr;

use crate::icmp::v4::{IcmpSocket, IcmpV4, Identifier, SequenceCounter, Socket, SocketType};
use crate::ping_error::PingError;
use crate::{PingReport, PingResult};

// Enough for an IP header plus one echo message.
const RECEIVE_BUFFER_LEN: usize = 256;

/// One ping session towards one destination.
///
/// Reusable across bursts: `run` resets the counters, the socket stays open
/// and the sequence counter keeps climbing, so two consecutive bursts never
/// share a sequence number. The socket is closed when the session is dropped.
pub struct PingSession(SessionImpl<IcmpSocket>);

impl PingSession {
    /// Session over a raw ICMP socket (requires privilege).
    /// Fails if `destination` is not a dotted-decimal IPv4 address.
    pub fn new(destination: &str, timeout: Duration) -> PingResult<Self> {
        Self::with_socket_type(destination, timeout, SocketType::Raw)
    }

    pub fn with_socket_type(
        destination: &str,
        timeout: Duration,
        socket_type: SocketType,
    ) -> PingResult<Self> {
        Ok(PingSession(SessionImpl::new(destination, timeout, socket_type)?))
    }

    /// Sends a burst of `packet_count` echo requests and waits (bounded by
    /// the session timeout per wait) for the matching replies.
    ///
    /// Only socket-open failures are errors; everything that goes wrong per
    /// packet shows up as `packets_received < packets_sent` in the report.
    pub fn run(&mut self, packet_count: u16) -> PingResult<PingReport> {
        self.0.run(packet_count)
    }
}

struct SessionImpl<S> {
    destination: Ipv4Addr,
    timeout: Duration,
    socket_type: SocketType,
    identifier: Identifier,
    sequence: SequenceCounter,
    icmpv4: IcmpV4,
    socket: Option<S>,
    packets_sent: u32,
    packets_received: u32,
    burst_start: Option<SystemTime>,
    last_receive: Option<SystemTime>,
}

impl<S> SessionImpl<S>
where
    S: Socket,
{
    fn new(destination: &str, timeout: Duration, socket_type: SocketType) -> PingResult<Self> {
        let destination: Ipv4Addr = destination.parse().map_err(|_| PingError {
            message: format!("invalid destination address: {destination}"),
            source: None,
        })?;
        Ok(Self {
            destination,
            timeout,
            socket_type,
            identifier: Identifier::from_process(),
            sequence: SequenceCounter::new(),
            icmpv4: IcmpV4::new(),
            socket: None,
            packets_sent: 0,
            packets_received: 0,
            burst_start: None,
            last_receive: None,
        })
    }

    #[cfg(test)]
    fn with_socket(destination: &str, timeout: Duration, socket: S) -> PingResult<Self> {
        let mut session = Self::new(destination, timeout, SocketType::Raw)?;
        session.socket = Some(socket);
        Ok(session)
    }

    fn run(&mut self, packet_count: u16) -> PingResult<PingReport> {
        self.packets_sent = 0;
        self.packets_received = 0;
        self.burst_start = None;
        self.last_receive = None;

        if packet_count == 0 {
            return Ok(PingReport {
                packets_sent: 0,
                packets_received: 0,
                elapsed_ms: 0.0,
            });
        }

        // Lazily opened on the first non-empty burst, then reused.
        if self.socket.is_none() {
            let socket = S::open(self.socket_type, self.identifier).map_err(|error| PingError {
                message: "could not open ICMP socket".to_owned(),
                source: Some(Box::new(error)),
            })?;
            self.socket = Some(socket);
        }
        let socket = self.socket.as_ref().expect("socket was opened above");

        let destination_addr: SockAddr =
            SocketAddr::V4(SocketAddrV4::new(self.destination, 0)).into();
        let mut receive_buf = [0u8; RECEIVE_BUFFER_LEN];

        for _ in 0..packet_count {
            let sequence_number = self.sequence.next();
            let (packet, send_time) =
                self.icmpv4.encode_echo_request(self.identifier, sequence_number);
            if self.packets_sent == 0 {
                // Re-recorded until the first send succeeds, so a leading
                // failed send does not skew the elapsed time.
                self.burst_start = Some(send_time);
            }

            match socket.send_to(&packet, &destination_addr) {
                Ok(_) => {
                    self.packets_sent += 1;
                    tracing::trace!(sequence_number = sequence_number.0, "echo request sent");
                }
                Err(error) => {
                    tracing::warn!(%error, "could not send echo request");
                }
            }

            // Drain replies for everything sent so far in this burst; a true
            // timeout ends the wait for this packet, not the burst.
            while self.packets_received < self.packets_sent {
                match socket.recv_from(&mut receive_buf, self.timeout) {
                    Ok(None) => {
                        tracing::debug!("receive timed out");
                        break;
                    }
                    Err(error) => {
                        tracing::warn!(%error, "receive failed");
                        break;
                    }
                    Ok(Some((len, source))) => {
                        let received_at = SystemTime::now();
                        let IpAddr::V4(source) = source else {
                            tracing::trace!("discarding packet from non-IPv4 source");
                            continue;
                        };
                        match IcmpV4::decode_echo_reply(
                            &receive_buf[..len],
                            source,
                            self.identifier,
                            self.destination,
                        ) {
                            Ok(reply) => {
                                self.packets_received += 1;
                                self.last_receive = Some(received_at);
                                tracing::trace!(
                                    identifier = reply.identifier.0,
                                    sequence_number = reply.sequence_number.0,
                                    source = %reply.source,
                                    "echo reply accepted"
                                );
                            }
                            Err(reject) => {
                                tracing::trace!(?reject, "discarding packet");
                            }
                        }
                    }
                }
            }
        }

        Ok(PingReport {
            packets_sent: self.packets_sent,
            packets_received: self.packets_received,
            elapsed_ms: self.elapsed_ms(),
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn elapsed_ms(&self) -> f64 {
        match (self.burst_start, self.last_receive) {
            (Some(start), Some(end)) => {
                let elapsed = end.duration_since(start).unwrap_or_default();
                elapsed.as_secs() as f64 * 1000.0 + f64::from(elapsed.subsec_micros()) / 1000.0
            }
            // No accepted reply, deterministic zero.
            _ => 0.0,
        }
    }
}
