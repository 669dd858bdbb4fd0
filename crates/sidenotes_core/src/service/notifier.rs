//! Observer list for "model changed" notifications.

use crate::model::note_model::NoteModel;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Handle returned by `ChangeNotifier::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

type Observer = Arc<dyn Fn(&NoteModel) + Send + Sync>;

/// Ordered observer list. Observers run on the notifying thread.
#[derive(Default)]
pub struct ChangeNotifier {
    observers: Mutex<Vec<(SubscriptionId, Observer)>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&NoteModel) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        let observer: Observer = Arc::new(observer);
        self.lock().push((id, observer));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.lock();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn notify(&self, model: &NoteModel) {
        // Snapshot so observers may (un)subscribe while being notified.
        let observers: Vec<Observer> = self
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(model);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Observer)>> {
        match self.observers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
