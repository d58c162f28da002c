use tokio::sync::{mpsc, oneshot};

use super::{Applier, WriteCommand, WriteError, WriteResult};

/// Handle for submitting writes to the coordinator.
///
/// This is the main interface for interacting with the write coordinator.
/// It can be cloned and shared across tasks; the coordinator stops once every
/// handle has been dropped.
pub struct WriteCoordinatorHandle<A: Applier> {
    cmd_tx: mpsc::Sender<WriteCommand<A>>,
}

impl<A: Applier> Clone for WriteCoordinatorHandle<A> {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
        }
    }
}

impl<A: Applier> WriteCoordinatorHandle<A> {
    pub(crate) fn new(cmd_tx: mpsc::Sender<WriteCommand<A>>) -> Self {
        Self { cmd_tx }
    }

    /// Submit a write and wait for the coordinator to apply it.
    ///
    /// Fails fast with [`WriteError::Backpressure`] when the queue is full
    /// instead of waiting for capacity.
    pub async fn write(&self, write: A::Write) -> WriteResult<A::Output> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .try_send(WriteCommand {
                write,
                result_tx: tx,
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => WriteError::Backpressure,
                mpsc::error::TrySendError::Closed(_) => WriteError::Shutdown,
            })?;

        rx.await.map_err(|_| WriteError::Shutdown)?
    }

    /// Returns the number of writes waiting in the queue.
    pub fn queued(&self) -> usize {
        self.cmd_tx.max_capacity() - self.cmd_tx.capacity()
    }

    /// Returns whether the coordinator is still accepting writes.
    pub fn is_open(&self) -> bool {
        !self.cmd_tx.is_closed()
    }
}
