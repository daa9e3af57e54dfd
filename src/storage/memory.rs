use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::{
    error::{LogoError, Result},
    models::LogoRecord,
    storage::traits::LogoStore,
};

/// Process-local store, keyed by owner then document key.
#[derive(Default)]
pub struct InMemoryLogoStore {
    owners: Mutex<HashMap<String, HashMap<String, LogoRecord>>>,
}

impl InMemoryLogoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, owner_id: &str, key: &str) -> Option<LogoRecord> {
        let owners = self.owners.lock().ok()?;
        owners.get(owner_id)?.get(key).cloned()
    }

    pub fn list(&self, owner_id: &str) -> Vec<(String, LogoRecord)> {
        let Ok(owners) = self.owners.lock() else {
            return Vec::new();
        };
        let mut records: Vec<_> = owners
            .get(owner_id)
            .map(|logos| logos.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        records.sort_by(|a, b| a.0.cmp(&b.0));
        records
    }

    pub fn len(&self) -> usize {
        self.owners
            .lock()
            .map(|owners| owners.values().map(HashMap::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LogoStore for InMemoryLogoStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn save(&self, owner_id: &str, key: &str, record: &LogoRecord) -> Result<()> {
        if owner_id.trim().is_empty() {
            return Err(LogoError::Persistence("owner id is empty".into()));
        }
        let mut owners = self
            .owners
            .lock()
            .map_err(|_| LogoError::Persistence("store lock poisoned".into()))?;
        let logos = owners.entry(owner_id.to_string()).or_default();
        if logos.contains_key(key) {
            return Err(LogoError::Persistence(format!(
                "users/{}/logos/{} already exists",
                owner_id, key
            )));
        }
        logos.insert(key.to_string(), record.clone());
        Ok(())
    }
}
