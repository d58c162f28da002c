//! Single-writer coordination.
//!
//! A [`WriteCoordinator`] owns an [`Applier`] and applies submitted writes
//! strictly one at a time, in queue order. Submitters hold a cloneable
//! [`WriteCoordinatorHandle`] and wait for the result of their own write.

mod error;
mod handle;
mod traits;

pub use error::{WriteError, WriteResult};
pub use handle::WriteCoordinatorHandle;
pub use traits::Applier;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Configuration for the write coordinator.
#[derive(Debug, Clone)]
pub struct WriteCoordinatorConfig {
    /// Maximum number of pending writes in the queue.
    pub queue_capacity: usize,
}

impl Default for WriteCoordinatorConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
        }
    }
}

pub(crate) struct WriteCommand<A: Applier> {
    write: A::Write,
    result_tx: oneshot::Sender<WriteResult<A::Output>>,
}

/// The write coordinator serializes writes through a single applier.
pub struct WriteCoordinator<A: Applier> {
    name: String,
    applier: A,
    cmd_rx: mpsc::Receiver<WriteCommand<A>>,
    epoch: u64,
}

impl<A: Applier> WriteCoordinator<A> {
    /// Create a new coordinator and the handle used to submit writes to it.
    pub fn new(
        name: impl Into<String>,
        config: WriteCoordinatorConfig,
        applier: A,
    ) -> (Self, WriteCoordinatorHandle<A>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(config.queue_capacity.max(1));
        let coordinator = Self {
            name: name.into(),
            applier,
            cmd_rx,
            epoch: 1,
        };
        (coordinator, WriteCoordinatorHandle::new(cmd_tx))
    }

    /// Create a coordinator and run it on a new tokio task.
    pub fn spawn(
        name: impl Into<String>,
        config: WriteCoordinatorConfig,
        applier: A,
    ) -> (WriteCoordinatorHandle<A>, JoinHandle<()>) {
        let (coordinator, handle) = Self::new(name, config, applier);
        let task = tokio::spawn(coordinator.run());
        (handle, task)
    }

    /// Run the coordinator loop until every handle has been dropped.
    pub async fn run(mut self) {
        tracing::debug!(coordinator = %self.name, "write coordinator started");
        while let Some(cmd) = self.cmd_rx.recv().await {
            self.handle_write(cmd).await;
        }
        tracing::debug!(coordinator = %self.name, "write coordinator stopped");
    }

    async fn handle_write(&mut self, cmd: WriteCommand<A>) {
        let WriteCommand { write, result_tx } = cmd;
        let write_epoch = self.epoch;
        self.epoch += 1;

        let result = self.applier.apply(write).await.map_err(|msg| {
            tracing::warn!(
                coordinator = %self.name,
                epoch = write_epoch,
                error = %msg,
                "write failed"
            );
            WriteError::ApplyError(write_epoch, msg)
        });

        // Ignore error if the submitter stopped waiting
        let _ = result_tx.send(result);
    }
}
