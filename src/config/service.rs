use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::config::settings::{SettingKey, Settings};
use crate::storage::{SettingsStore, StoreError};

/// Callback invoked with the new value whenever its key changes.
///
/// Handing out `Arc`s gives callers a stable identity to deduplicate and
/// unregister by.
pub type ChangeCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Observable settings store for the plugin.
///
/// Owns the in-memory record, dispatches per-key change callbacks, and
/// delegates persistence to the injected [`SettingsStore`]. Storage failures
/// are not caught here; they propagate to whoever called `load`/`save`.
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    settings: Settings,
    callbacks: HashMap<SettingKey, Vec<ChangeCallback>>,
}

impl SettingsService {
    /// The record starts at the defaults; call [`load`](Self::load) before
    /// reading values that may have been persisted.
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            settings: Settings::default(),
            callbacks: HashMap::new(),
        }
    }

    pub fn get(&self, key: SettingKey) -> bool {
        self.settings.get(key)
    }

    /// Overwrite `key` unconditionally and notify its subscribers with the
    /// new value before returning. There is no equality check; setting a key
    /// to its current value still notifies.
    pub fn set(&mut self, key: SettingKey, value: bool) {
        self.settings.set(key, value);
        if self.settings.debug {
            tracing::debug!("setting {} = {}", key, value);
        }
        self.notify(key, value);
    }

    /// Register `callback` for changes of `key`.
    ///
    /// Registering the same `Arc` twice for one key is a no-op. The callback
    /// is not invoked with the current value at registration time.
    pub fn on_change(&mut self, key: SettingKey, callback: ChangeCallback) {
        let entries = self.callbacks.entry(key).or_default();
        if entries.iter().any(|cb| Arc::ptr_eq(cb, &callback)) {
            return;
        }
        entries.push(callback);
    }

    /// Unregister a callback by identity; no-op when it was never registered.
    pub fn remove_callback(&mut self, key: SettingKey, callback: &ChangeCallback) {
        if let Some(entries) = self.callbacks.get_mut(&key) {
            entries.retain(|cb| !Arc::ptr_eq(cb, callback));
        }
    }

    /// Restore every field to its default value.
    ///
    /// Each field goes through [`set`](Self::set), so every key notifies its
    /// subscribers even when the value did not actually change. Listeners
    /// that mirror the record (the panel, the editor engine) rely on this to
    /// resync in one pass.
    pub fn reset(&mut self) {
        let defaults = Settings::default();
        for key in SettingKey::ALL {
            self.set(key, defaults.get(key));
        }
    }

    /// Replace the record with the persisted state merged over defaults.
    ///
    /// The record is swapped wholesale; change callbacks do not fire for
    /// fields that differ from the previous in-memory state.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        let value = self.store.load_data().await?;
        self.settings = Settings::from_persisted(value)?;
        Ok(())
    }

    /// Persist the full record as of this call.
    ///
    /// The returned future owns a snapshot taken at dispatch time, so a `set`
    /// racing an in-flight save cannot leak into the bytes being written, and
    /// the future can be spawned on a runtime without borrowing the service.
    pub fn save(&self) -> impl Future<Output = Result<(), StoreError>> + Send + 'static {
        let store = Arc::clone(&self.store);
        let snapshot = self.settings.clone();
        async move { store.save_data(&snapshot).await }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn notify(&self, key: SettingKey, value: bool) {
        if let Some(entries) = self.callbacks.get(&key) {
            for callback in entries {
                callback(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn service() -> SettingsService {
        SettingsService::new(Arc::new(MemoryStore::new()))
    }

    fn counting_callback() -> (ChangeCallback, Arc<AtomicUsize>, Arc<AtomicBool>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicBool::new(false));
        let calls2 = calls.clone();
        let last2 = last.clone();
        let cb: ChangeCallback = Arc::new(move |value| {
            calls2.fetch_add(1, Ordering::SeqCst);
            last2.store(value, Ordering::SeqCst);
        });
        (cb, calls, last)
    }

    #[test]
    fn test_get_after_set_for_every_key() {
        let mut svc = service();
        for key in SettingKey::ALL {
            svc.set(key, true);
            assert_eq!(svc.get(key), true);
            svc.set(key, false);
            assert_eq!(svc.get(key), false);
        }
    }

    #[test]
    fn test_set_debug_leaves_other_fields_alone() {
        let mut svc = service();
        svc.set(SettingKey::Debug, true);
        assert_eq!(svc.get(SettingKey::Debug), true);
        let defaults = Settings::default();
        for key in SettingKey::ALL {
            if key != SettingKey::Debug {
                assert_eq!(svc.get(key), defaults.get(key), "key {}", key);
            }
        }
    }

    #[test]
    fn test_callback_fires_once_with_new_value() {
        let mut svc = service();
        let (cb, calls, last) = counting_callback();
        svc.on_change(SettingKey::StyleLists, cb.clone());
        svc.set(SettingKey::StyleLists, true);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), true);

        svc.remove_callback(SettingKey::StyleLists, &cb);
        svc.set(SettingKey::StyleLists, false);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_registering_same_callback_twice_is_idempotent() {
        let mut svc = service();
        let (cb, calls, _) = counting_callback();
        svc.on_change(SettingKey::Debug, cb.clone());
        svc.on_change(SettingKey::Debug, cb);
        svc.set(SettingKey::Debug, true);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_registration_does_not_invoke_immediately() {
        let mut svc = service();
        let (cb, calls, _) = counting_callback();
        svc.on_change(SettingKey::BetterEnter, cb);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_callback_only_fires_for_its_own_key() {
        let mut svc = service();
        let (cb, calls, _) = counting_callback();
        svc.on_change(SettingKey::StickCursor, cb);
        svc.set(SettingKey::SelectAll, false);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_remove_unregistered_callback_is_noop() {
        let mut svc = service();
        let (cb, _, _) = counting_callback();
        svc.remove_callback(SettingKey::HideWarning, &cb);
    }

    #[test]
    fn test_reset_restores_defaults_and_notifies_every_key() {
        let mut svc = service();
        svc.set(SettingKey::StyleLists, true);
        svc.set(SettingKey::StickCursor, false);

        let mut counters = Vec::new();
        for key in SettingKey::ALL {
            let (cb, calls, _) = counting_callback();
            svc.on_change(key, cb);
            counters.push(calls);
        }

        svc.reset();
        assert_eq!(svc.settings(), &Settings::default());
        // Keys already at their default still notify
        for (key, calls) in SettingKey::ALL.iter().zip(&counters) {
            assert_eq!(calls.load(Ordering::SeqCst), 1, "key {}", key);
        }
    }

    #[tokio::test]
    async fn test_load_empty_store_yields_defaults() {
        let mut svc = service();
        svc.load().await.unwrap();
        assert_eq!(svc.settings(), &Settings::default());
    }

    #[tokio::test]
    async fn test_load_merges_partial_record_over_defaults() {
        let store = Arc::new(MemoryStore::with_data(json!({
            "betterEnter": false,
            "hideWarning": true,
        })));
        let mut svc = SettingsService::new(store);
        svc.load().await.unwrap();
        assert_eq!(svc.get(SettingKey::BetterEnter), false);
        assert_eq!(svc.get(SettingKey::HideWarning), true);
        assert_eq!(svc.get(SettingKey::StickCursor), true);
    }

    #[tokio::test]
    async fn test_load_replaces_record_without_firing_callbacks() {
        let store = Arc::new(MemoryStore::with_data(json!({ "styleLists": true })));
        let mut svc = SettingsService::new(store);
        let (cb, calls, _) = counting_callback();
        svc.on_change(SettingKey::StyleLists, cb);
        svc.load().await.unwrap();
        assert_eq!(svc.get(SettingKey::StyleLists), true);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_save_snapshots_record_at_dispatch_time() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = SettingsService::new(store.clone());
        svc.set(SettingKey::Debug, true);

        let save = svc.save();
        // Mutation after dispatch must not leak into the in-flight save
        svc.set(SettingKey::Debug, false);
        save.await.unwrap();

        let persisted = store.load_data().await.unwrap();
        assert_eq!(persisted["debug"], json!(true));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = SettingsService::new(store.clone());
        svc.set(SettingKey::StyleLists, true);
        svc.set(SettingKey::SelectAll, false);
        svc.save().await.unwrap();

        let mut fresh = SettingsService::new(store);
        fresh.load().await.unwrap();
        assert_eq!(fresh.settings(), svc.settings());
    }
}
