// src/sink/memory.rs
use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;

use super::{DocumentSink, Fields};

/// In-process document store with the same merge semantics as the real one.
#[derive(Default)]
pub struct MemorySink {
    docs: RwLock<HashMap<String, Fields>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Fields> {
        self.docs.read().expect("rwlock poisoned").get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.read().expect("rwlock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<String> {
        self.docs
            .read()
            .expect("rwlock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl DocumentSink for MemorySink {
    async fn upsert(&self, id: &str, fields: &Fields) -> Result<()> {
        let mut docs = self.docs.write().expect("rwlock poisoned");
        let doc = docs.entry(id.to_string()).or_default();
        for (k, v) in fields {
            doc.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
