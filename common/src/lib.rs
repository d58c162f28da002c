pub mod clock;
pub mod coordinator;
pub mod storage;

pub use clock::{Clock, MockClock, SystemClock};
pub use coordinator::{
    Applier, WriteCoordinator, WriteCoordinatorConfig, WriteCoordinatorHandle, WriteError,
    WriteResult,
};
pub use storage::config::{LocalStorageConfig, StorageConfig};
pub use storage::factory::create_storage;
pub use storage::in_memory::InMemoryStorage;
pub use storage::local::LocalStorage;
pub use storage::{Storage, StorageError, StorageRead, StorageResult};
