use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use super::context::{demo_roster, Geolocation, UserContext};

// STORAGE

/// Single-key persistence for the current context. The store treats it as a
/// dumb string slot; serialization happens above it.
pub trait ContextStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>, String>;
    fn save(&self, raw: &str) -> Result<(), String>;
    fn remove(&self) -> Result<(), String>;
}

/// One JSON file on disk
pub struct FileContextStorage {
    path: PathBuf,
}

impl FileContextStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ContextStorage for FileContextStorage {
    fn load(&self) -> Result<Option<String>, String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(format!("could not read {}: {}", self.path.display(), e)),
        }
    }

    fn save(&self, raw: &str) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("could not create {}: {}", parent.display(), e))?;
        }
        fs::write(&self.path, raw)
            .map_err(|e| format!("could not write {}: {}", self.path.display(), e))
    }

    fn remove(&self) -> Result<(), String> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("could not remove {}: {}", self.path.display(), e)),
        }
    }
}

/// Storage for contexts where no persistent slot exists. Reads fail, so the
/// store falls safe to the first roster entry.
pub struct UnavailableContextStorage;

impl ContextStorage for UnavailableContextStorage {
    fn load(&self) -> Result<Option<String>, String> {
        Err("context storage unavailable".to_string())
    }

    fn save(&self, _raw: &str) -> Result<(), String> {
        Err("context storage unavailable".to_string())
    }

    fn remove(&self) -> Result<(), String> {
        Err("context storage unavailable".to_string())
    }
}

// STORE

/// Change notifications delivered to in-process observers
#[derive(Debug, Clone)]
pub enum ContextChange {
    Switched(UserContext),
    Cleared,
}

type Observer = Box<dyn Fn(&ContextChange) + Send + Sync>;

/// Single source of truth for who the current demo user is. One logical
/// instance per process, handed to consumers through application state.
pub struct UserContextStore {
    storage: Box<dyn ContextStorage>,
    current: RwLock<Option<UserContext>>,
    observers: Mutex<Vec<Observer>>,
    rng: Mutex<StdRng>,
}

impl UserContextStore {
    /// `seed` pins the roster pick for tests; production passes None and
    /// gets entropy.
    pub fn new(storage: Box<dyn ContextStorage>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            storage,
            current: RwLock::new(None),
            observers: Mutex::new(Vec::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Register an observer for context changes. Observers run synchronously
    /// on the mutating call, after the store's own state is updated.
    pub fn subscribe(&self, observer: impl Fn(&ContextChange) + Send + Sync + 'static) {
        if let Ok(mut observers) = self.observers.lock() {
            observers.push(Box::new(observer));
        }
    }

    /// Current context without creating one
    pub fn current(&self) -> Option<UserContext> {
        self.current.read().map(|c| c.clone()).unwrap_or(None)
    }

    /// The persisted context if present and well-formed, otherwise a fresh
    /// pseudo-random roster pick that is persisted on the way out. Malformed
    /// persisted data counts as absent; unavailable storage falls safe to
    /// the first roster entry without persisting anything.
    pub fn get_or_create_current(&self) -> UserContext {
        if let Some(ctx) = self.current() {
            return ctx;
        }

        match self.storage.load() {
            Ok(Some(raw)) => match serde_json::from_str::<UserContext>(&raw) {
                Ok(ctx) if ctx.is_well_formed() => {
                    self.remember(ctx.clone());
                    return ctx;
                }
                _ => {
                    eprintln!("persisted context malformed, recreating");
                }
            },
            Ok(None) => {}
            Err(e) => {
                eprintln!("context storage unavailable: {}", e);
                return demo_roster().remove(0);
            }
        }

        let ctx = self.pick_from_roster();
        self.persist(&ctx);
        self.remember(ctx.clone());
        ctx
    }

    /// Wholesale replacement of the current context. Persists, then updates
    /// the in-memory view, then notifies observers; the writer never sees a
    /// stale read after this returns.
    pub fn set_current(&self, ctx: UserContext) {
        self.persist(&ctx);
        self.remember(ctx.clone());
        self.notify(&ContextChange::Switched(ctx));
    }

    /// Remove the persisted context (reset flows)
    pub fn clear_current(&self) {
        if let Err(e) = self.storage.remove() {
            eprintln!("could not clear persisted context: {}", e);
        }
        if let Ok(mut current) = self.current.write() {
            *current = None;
        }
        self.notify(&ContextChange::Cleared);
    }

    /// Explicit cross-view change signal: another view of the same persisted
    /// slot already wrote it, so this only updates memory and notifies.
    pub fn apply_external_change(&self, ctx: Option<UserContext>) {
        match ctx {
            Some(ctx) => {
                self.remember(ctx.clone());
                self.notify(&ContextChange::Switched(ctx));
            }
            None => {
                if let Ok(mut current) = self.current.write() {
                    *current = None;
                }
                self.notify(&ContextChange::Cleared);
            }
        }
    }

    /// The one sanctioned partial mutation: geolocation enrichment.
    /// Everything else replaces the context wholesale.
    pub fn enrich_geolocation(&self, geo: Geolocation) -> Option<UserContext> {
        let updated = {
            let mut current = self.current.write().ok()?;
            let ctx = current.as_mut()?;
            ctx.geolocation = Some(geo);
            ctx.clone()
        };
        self.persist(&updated);
        self.notify(&ContextChange::Switched(updated.clone()));
        Some(updated)
    }

    fn pick_from_roster(&self) -> UserContext {
        let mut roster = demo_roster();
        let index = self
            .rng
            .lock()
            .map(|mut rng| rng.gen_range(0..roster.len()))
            .unwrap_or(0);
        roster.remove(index)
    }

    fn remember(&self, ctx: UserContext) {
        if let Ok(mut current) = self.current.write() {
            *current = Some(ctx);
        }
    }

    fn persist(&self, ctx: &UserContext) {
        match serde_json::to_string(ctx) {
            Ok(raw) => {
                if let Err(e) = self.storage.save(&raw) {
                    eprintln!("could not persist context: {}", e);
                }
            }
            Err(e) => eprintln!("could not serialize context: {}", e),
        }
    }

    fn notify(&self, change: &ContextChange) {
        if let Ok(observers) = self.observers.lock() {
            for observer in observers.iter() {
                observer(change);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::context::SubscriptionTier;
    use std::sync::Arc;

    fn file_store(dir: &tempfile::TempDir, seed: u64) -> UserContextStore {
        let storage = FileContextStorage::new(dir.path().join("current-user.json"));
        UserContextStore::new(Box::new(storage), Some(seed))
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir, 7);

        let first = store.get_or_create_current();
        let second = store.get_or_create_current();
        assert_eq!(first.key, second.key);
        assert_eq!(first, second);
    }

    #[test]
    fn test_created_context_survives_a_new_store() {
        let dir = tempfile::tempdir().unwrap();
        let first = file_store(&dir, 7).get_or_create_current();

        // different seed: if the slot were ignored this would likely differ
        let second = file_store(&dir, 8).get_or_create_current();
        assert_eq!(first.key, second.key);
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir, 1);

        let mut ctx = demo_roster()[2].clone();
        ctx.subscription_tier = SubscriptionTier::Enterprise;
        store.set_current(ctx.clone());

        let read = store.get_or_create_current();
        assert_eq!(read.key, ctx.key);
        assert_eq!(read.email, ctx.email);
        assert_eq!(read.subscription_tier, SubscriptionTier::Enterprise);
    }

    #[test]
    fn test_malformed_persisted_context_is_recreated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("current-user.json");
        fs::write(&path, "{ not json").unwrap();

        let store = UserContextStore::new(Box::new(FileContextStorage::new(path.clone())), Some(3));
        let ctx = store.get_or_create_current();
        assert!(ctx.is_well_formed());

        // the slot was rewritten with the fresh context
        let raw = fs::read_to_string(&path).unwrap();
        let persisted: UserContext = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.key, ctx.key);
    }

    #[test]
    fn test_well_formed_check_applies_to_persisted_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("current-user.json");
        let mut ctx = demo_roster()[0].clone();
        ctx.key = "".to_string();
        fs::write(&path, serde_json::to_string(&ctx).unwrap()).unwrap();

        let store = UserContextStore::new(Box::new(FileContextStorage::new(path)), Some(3));
        let created = store.get_or_create_current();
        assert!(!created.key.is_empty());
    }

    #[test]
    fn test_unavailable_storage_falls_safe_to_first_roster_entry() {
        let store = UserContextStore::new(Box::new(UnavailableContextStorage), Some(42));
        let ctx = store.get_or_create_current();
        assert_eq!(ctx.key, demo_roster()[0].key);

        // repeated calls stay on the same fail-safe entry
        assert_eq!(store.get_or_create_current().key, ctx.key);
    }

    #[test]
    fn test_seeded_pick_is_deterministic() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        let a = file_store(&dir_a, 99).get_or_create_current();
        let b = file_store(&dir_b, 99).get_or_create_current();
        assert_eq!(a.key, b.key);
    }

    #[test]
    fn test_observers_see_switch_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir, 1);

        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |change| {
            let label = match change {
                ContextChange::Switched(ctx) => format!("switched:{}", ctx.key),
                ContextChange::Cleared => "cleared".to_string(),
            };
            sink.lock().unwrap().push(label);
        });

        store.set_current(demo_roster()[1].clone());
        store.clear_current();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), ["switched:demo-morgan", "cleared"]);
    }

    #[test]
    fn test_external_change_updates_memory_without_persisting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("current-user.json");
        let store = UserContextStore::new(Box::new(FileContextStorage::new(path.clone())), Some(1));

        store.apply_external_change(Some(demo_roster()[1].clone()));
        assert_eq!(store.current().unwrap().key, "demo-morgan");
        assert!(!path.exists(), "external change must not re-persist");

        store.apply_external_change(None);
        assert!(store.current().is_none());
    }

    #[test]
    fn test_geolocation_enrichment_is_partial() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir, 1);
        let before = store.get_or_create_current();

        let geo = Geolocation {
            latitude: 52.52,
            longitude: 13.405,
            accuracy: 25.0,
        };
        let after = store.enrich_geolocation(geo).unwrap();

        assert_eq!(after.key, before.key);
        assert_eq!(after.subscription_tier, before.subscription_tier);
        assert_eq!(after.geolocation, Some(geo));
    }

    #[test]
    fn test_clear_then_create_starts_over() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir, 5);

        let first = store.get_or_create_current();
        store.clear_current();
        assert!(store.current().is_none());

        let next = store.get_or_create_current();
        assert!(next.is_well_formed());
        // either way it must be a roster archetype
        assert!(demo_roster().iter().any(|c| c.key == next.key));
        let _ = first;
    }
}
