use async_trait::async_trait;

/// Applies writes one at a time on behalf of a [`WriteCoordinator`].
///
/// The coordinator owns the applier and never calls [`apply`](Applier::apply)
/// concurrently, so implementations may perform read-modify-write cycles
/// against storage without further locking.
///
/// [`WriteCoordinator`]: super::WriteCoordinator
#[async_trait]
pub trait Applier: Send + 'static {
    type Write: Send + 'static;
    type Output: Send + 'static;

    /// Apply a write and return its result to the submitter.
    async fn apply(&mut self, write: Self::Write) -> Result<Self::Output, String>;
}
