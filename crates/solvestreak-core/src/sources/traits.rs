use async_trait::async_trait;

use crate::platform::Platform;

/// Every platform adapter implements this trait.
///
/// Adapters never fail outward: network errors, timeouts, unexpected
/// payloads and unknown users all come back as `None`, with the reason
/// logged. Identity and timeout are fixed at construction.
#[async_trait]
pub trait SolvedCountSource: Send + Sync {
    /// Platform this adapter reports for.
    fn platform(&self) -> Platform;

    /// Total solved problems for the configured user, if it could be determined.
    async fn fetch_solved_count(&self) -> Option<u64>;
}
