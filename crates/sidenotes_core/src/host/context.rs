//! Published context flags read by host UI logic.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Sink for process-wide context values such as the notes count.
pub trait ContextPublisher: Send + Sync {
    fn publish(&self, key: &str, value: usize);
}

/// In-memory, cloneable context store.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct SharedContext {
    values: Arc<RwLock<BTreeMap<String, usize>>>,
}

impl SharedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        match self.values.read() {
            Ok(values) => values.get(key).copied(),
            Err(poisoned) => poisoned.into_inner().get(key).copied(),
        }
    }
}

impl ContextPublisher for SharedContext {
    fn publish(&self, key: &str, value: usize) {
        let mut values = match self.values.write() {
            Ok(values) => values,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextPublisher, SharedContext};

    #[test]
    fn clones_observe_published_values() {
        let context = SharedContext::new();
        let reader = context.clone();
        assert_eq!(reader.get("notesView.notesLen"), None);

        context.publish("notesView.notesLen", 3);
        context.publish("notesView.notesLen", 1);
        assert_eq!(reader.get("notesView.notesLen"), Some(1));
    }
}
