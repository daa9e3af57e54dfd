#[cfg(feature = "firestore")]
pub mod firestore;
pub mod memory;
pub mod traits;

use std::sync::Arc;

use crate::{
    config::{Config, StoreKind},
    error::Result,
};

#[cfg(feature = "firestore")]
pub use firestore::FirestoreLogoStore;
pub use memory::InMemoryLogoStore;
pub use traits::LogoStore;

pub fn store_from_config(config: &Config) -> Result<Arc<dyn LogoStore>> {
    let store: Arc<dyn LogoStore> = match config.store {
        StoreKind::Memory => Arc::new(InMemoryLogoStore::new()),
        StoreKind::Firestore => {
            #[cfg(feature = "firestore")]
            {
                Arc::new(FirestoreLogoStore::new(config.firestore.clone())?)
            }
            #[cfg(not(feature = "firestore"))]
            {
                return Err(crate::error::LogoError::ConfigError(
                    "Firestore feature not enabled".into(),
                ));
            }
        }
    };

    Ok(store)
}
