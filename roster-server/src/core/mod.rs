//! Domain core: guards, allocation and the lifecycle manager

pub mod accounts;
pub mod allocator;
pub mod authorizer;
pub mod error;
pub mod files;
pub mod lifecycle;
pub mod pagination;
pub mod referential;
pub mod uniqueness;

pub use accounts::AccountService;
pub use allocator::SequentialCodeAllocator;
pub use error::{ErrorKind, LifecycleError, LifecycleResult};
pub use files::FileService;
pub use lifecycle::{EmployeeDraft, ResourceLifecycleManager};
pub use pagination::Page;
