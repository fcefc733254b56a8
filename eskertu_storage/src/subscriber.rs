use std::collections::BTreeSet;

use async_trait::async_trait;
use eskertu_models::subscriber::SubscriberAddress;
use tokio::sync::RwLock;

use crate::StorageError;

/// Set of addresses that receive reminder notifications.
#[async_trait]
pub trait SubscriberRegistry: Send + Sync {
    /// Adds `address` to the registry. Returns `true` if it was not registered before.
    async fn register(&self, address: SubscriberAddress) -> Result<bool, StorageError>;

    /// Returns every registered address, without duplicates.
    async fn list_all(&self) -> Result<Vec<SubscriberAddress>, StorageError>;
}

#[derive(Default)]
pub struct InMemorySubscriberRegistry {
    addresses: RwLock<BTreeSet<SubscriberAddress>>,
}

impl InMemorySubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriberRegistry for InMemorySubscriberRegistry {
    async fn register(&self, address: SubscriberAddress) -> Result<bool, StorageError> {
        Ok(self.addresses.write().await.insert(address))
    }

    async fn list_all(&self) -> Result<Vec<SubscriberAddress>, StorageError> {
        Ok(self.addresses.read().await.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    #[tokio::test]
    async fn registering_twice_is_a_noop() {
        let registry = InMemorySubscriberRegistry::new();

        assert!(registry.register(100).await.unwrap());
        assert!(!registry.register(100).await.unwrap());

        assert_eq!(registry.list_all().await.unwrap(), vec![100]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registration_adds_address_once() {
        let registry = std::sync::Arc::new(InMemorySubscriberRegistry::new());

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.register(7).await.unwrap() })
            })
            .collect();

        let mut newly_added = 0;
        for task in tasks {
            if task.await.unwrap() {
                newly_added += 1;
            }
        }

        assert_eq!(newly_added, 1);
        assert_eq!(registry.list_all().await.unwrap(), vec![7]);
    }

    proptest! {
        #[test]
        fn list_all_never_contains_duplicates(addresses in prop::collection::vec(-20i64..20, 0..64)) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let listed = runtime.block_on(async {
                let registry = InMemorySubscriberRegistry::new();
                for address in &addresses {
                    registry.register(*address).await.unwrap();
                }
                registry.list_all().await.unwrap()
            });

            let distinct: HashSet<_> = addresses.iter().copied().collect();
            prop_assert_eq!(listed.len(), distinct.len());
            prop_assert_eq!(listed.iter().copied().collect::<HashSet<_>>(), distinct);
        }
    }
}
