use std::net::Ipv4Addr;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use super::checksum::checksum;
use super::{Identifier, SequenceNumber};

pub(crate) const ICMP_HEADER_SIZE: usize = 8;
pub(crate) const PAYLOAD_SIZE: usize = 56;
pub(crate) const PACKET_SIZE: usize = ICMP_HEADER_SIZE + PAYLOAD_SIZE;

const ECHO_REQUEST_TYPE: u8 = 8;
const ECHO_REPLY_TYPE: u8 = 0;

// Wall-clock send time at the front of the payload: seconds (u64) plus
// microseconds (u32), network order.
const TIMESTAMP_SIZE: usize = 12;

/// Why an incoming buffer was not counted as a reply to one of our requests.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Reject {
    Truncated,
    BadChecksum,
    WrongType,
    IdentifierMismatch,
    SourceMismatch,
}

/// Parsed view over a received echo reply. Lives only for one
/// receive/validate cycle.
#[derive(Debug)]
pub(crate) struct EchoReply {
    pub(crate) identifier: Identifier,
    pub(crate) sequence_number: SequenceNumber,
    pub(crate) source: Ipv4Addr,
}

pub(crate) struct IcmpV4 {
    payload_tail: [u8; PAYLOAD_SIZE - TIMESTAMP_SIZE],
}

impl IcmpV4 {
    pub(crate) fn new() -> IcmpV4 {
        let mut payload_tail = [0u8; PAYLOAD_SIZE - TIMESTAMP_SIZE];
        rand::thread_rng().fill(&mut payload_tail[..]);
        IcmpV4 { payload_tail }
    }

    /// Builds one echo request: 8-byte header followed by a 56-byte payload
    /// whose first bytes carry the wall-clock send time. Returns the wire
    /// image together with the timestamp embedded in it.
    pub(crate) fn encode_echo_request(
        &self,
        identifier: Identifier,
        sequence_number: SequenceNumber,
    ) -> ([u8; PACKET_SIZE], SystemTime) {
        let mut buf = [0u8; PACKET_SIZE];
        buf[0] = ECHO_REQUEST_TYPE;
        buf[1] = 0; // code
        // bytes 2..4 stay zero until the checksum is known
        buf[4..6].copy_from_slice(&identifier.0.to_be_bytes());
        buf[6..8].copy_from_slice(&sequence_number.0.to_be_bytes());

        let send_time = SystemTime::now();
        let since_epoch = send_time.duration_since(UNIX_EPOCH).unwrap_or_default();
        buf[8..16].copy_from_slice(&since_epoch.as_secs().to_be_bytes());
        buf[16..20].copy_from_slice(&since_epoch.subsec_micros().to_be_bytes());
        buf[ICMP_HEADER_SIZE + TIMESTAMP_SIZE..].copy_from_slice(&self.payload_tail);

        let cksum = checksum(&buf);
        buf[2..4].copy_from_slice(&cksum.to_be_bytes());

        (buf, send_time)
    }

    /// Validates a received buffer as an echo reply addressed to this
    /// session. The checksum is verified before any other field is trusted;
    /// a reply is accepted only if its type is echo reply, its identifier
    /// matches ours and it comes from the probed destination.
    pub(crate) fn decode_echo_reply(
        buf: &[u8],
        source: Ipv4Addr,
        expected_identifier: Identifier,
        expected_source: Ipv4Addr,
    ) -> Result<EchoReply, Reject> {
        if buf.len() < ICMP_HEADER_SIZE {
            return Err(Reject::Truncated);
        }
        if checksum(buf) != 0 {
            return Err(Reject::BadChecksum);
        }
        if buf[0] != ECHO_REPLY_TYPE {
            return Err(Reject::WrongType);
        }
        let identifier = Identifier(u16::from_be_bytes([buf[4], buf[5]]));
        if identifier != expected_identifier {
            return Err(Reject::IdentifierMismatch);
        }
        if source != expected_source {
            return Err(Reject::SourceMismatch);
        }
        Ok(EchoReply {
            identifier,
            sequence_number: SequenceNumber(u16::from_be_bytes([buf[6], buf[7]])),
            source,
        })
    }
}
