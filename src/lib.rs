#![warn(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)] // TODO: document error conditions of the public API

//! Burst "ping" over ICMPv4: send a bounded burst of echo requests to a
//! single host, wait (with timeout) for matching replies and report
//! aggregate send/receive counts plus the elapsed time of the burst.

pub use icmp::v4::SocketType;
pub use ping_error::{GenericError, PingError, PingResult};
pub use ping_report::PingReport;
pub use session::PingSession;

mod icmp;
mod ping_error;
mod ping_report;
mod session;
