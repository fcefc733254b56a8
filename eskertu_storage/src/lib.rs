mod error;
pub mod sqlite;
mod subscriber;
mod tenant;

pub use error::{StorageError, TenantReadError};
pub use subscriber::{InMemorySubscriberRegistry, SubscriberRegistry};
pub use tenant::{InMemoryTenantStorage, TenantListing, TenantStorage};
