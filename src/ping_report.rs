/// Aggregate outcome of one burst. Immutable once returned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PingReport {
    pub packets_sent: u32,
    pub packets_received: u32,
    /// Milliseconds between the first send of the burst and the last
    /// accepted reply; 0.0 when no reply was accepted.
    pub elapsed_ms: f64,
}
