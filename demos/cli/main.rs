use std::time::Duration;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ping_burst::{GenericError, PingSession, SocketType};

#[derive(argh::FromArgs)]
/// ping - send a burst of ICMP ECHO_REQUEST messages and print totals
struct Args {
    #[argh(option, short = 'c', default = "4")]
    /// number of echo requests to send
    count: u16,

    #[argh(option, short = 't', default = "300")]
    /// per-wait receive timeout in milliseconds
    timeout_ms: u64,

    #[argh(switch)]
    /// use an unprivileged datagram socket instead of a raw socket
    dgram: bool,

    #[argh(positional)]
    /// destination IPv4 address (dotted decimal)
    destination: String,
}

fn main() -> Result<(), GenericError> {
    let args: Args = argh::from_env();

    let subscriber = FmtSubscriber::builder().with_max_level(Level::WARN).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let socket_type = if args.dgram { SocketType::Dgram } else { SocketType::Raw };
    let mut session = PingSession::with_socket_type(
        &args.destination,
        Duration::from_millis(args.timeout_ms),
        socket_type,
    )?;
    let report = session.run(args.count)?;

    println!("result:");
    println!("send: {}", report.packets_sent);
    println!("recv: {}", report.packets_received);
    println!("msec: {}", report.elapsed_ms);
    Ok(())
}
