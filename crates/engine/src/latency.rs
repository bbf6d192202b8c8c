//! Simulated network latency.

use std::time::Duration;

/// Fixed delay applied before every engine call settles.
///
/// The engine stands in for a remote API: each call waits this long, then
/// resolves once with a value or rejects once with an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Latency(Duration);

impl Latency {
    /// No delay at all. Handy for tests.
    pub const NONE: Latency = Latency(Duration::ZERO);

    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    /// Wait out the simulated delay.
    pub async fn wait(self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}
