mod checksum;
mod identifier;
mod packet;
mod sequence_number;
pub(crate) mod socket;

pub(crate) use identifier::Identifier;
pub(crate) use packet::IcmpV4;
pub(crate) use sequence_number::{SequenceCounter, SequenceNumber};
pub(crate) use socket::{IcmpSocket, Socket};
pub use socket::SocketType;
