//! Thread-safe handle around a [`DesktopStore`] for multi-threaded hosts.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    model::DesktopSnapshot,
    reducer::{ActionOutcome, DesktopAction, ReducerError},
    store::DesktopStore,
};

#[derive(Debug, Clone, Default)]
/// Cloneable handle that serializes every store operation behind one mutex.
pub struct SharedDesktopStore {
    inner: Arc<Mutex<DesktopStore>>,
}

impl SharedDesktopStore {
    pub fn new(store: DesktopStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with exclusive access to the store.
    pub fn with<R>(&self, f: impl FnOnce(&mut DesktopStore) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    pub fn snapshot(&self) -> DesktopSnapshot {
        self.inner.lock().snapshot()
    }

    /// # Errors
    ///
    /// See [`DesktopStore::dispatch`].
    pub fn dispatch(&self, action: DesktopAction) -> Result<ActionOutcome, ReducerError> {
        self.inner.lock().dispatch(action)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeSet, thread};

    use desktop_app_contract::AppId;

    use super::*;
    use crate::model::OpenWindowRequest;

    #[test]
    fn concurrent_opens_get_distinct_ids_and_stacking_values() {
        let shared = SharedDesktopStore::default();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared.with(|store| {
                            store.open_window(OpenWindowRequest::launch(AppId::Calculator))
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.windows.len(), 100);
        assert_eq!(snapshot.version, 100);
        let ids: BTreeSet<_> = snapshot.windows.iter().map(|w| w.id).collect();
        let z_values: BTreeSet<_> = snapshot.windows.iter().map(|w| w.z_index).collect();
        assert_eq!(ids.len(), 100);
        assert_eq!(z_values.len(), 100);
    }
}
