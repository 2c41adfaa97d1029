// ── Durable session-token slot ──
//
// One global keyed slot holding the session token between runs. Read
// once at session-store bootstrap, written/cleared only by session-store
// commands; no other component touches it.

use std::sync::{Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};

/// Durable persistence for the session token.
///
/// Implementations must not fail loudly: persistence is best-effort, and
/// a token that cannot be saved simply means the next run starts logged
/// out. `shopsync-config` provides the keyring-backed implementation;
/// [`MemoryTokenStore`] serves tests and embedded use.
pub trait TokenStore: Send + Sync {
    /// The persisted token, if any. Absent means logged out.
    fn load(&self) -> Option<SecretString>;

    /// Persist the token, replacing any previous value.
    fn save(&self, token: &SecretString);

    /// Remove the persisted token.
    fn clear(&self);
}

/// In-memory [`TokenStore`]: process-lifetime persistence only.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already present, as if persisted by a prior run.
    pub fn holding(token: &str) -> Self {
        Self {
            slot: Mutex::new(Some(token.to_owned())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<SecretString> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_deref()
            .map(SecretString::from)
    }

    fn save(&self, token: &SecretString) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(token.expose_secret().to_owned());
    }

    fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().is_none());

        store.save(&SecretString::from("tok"));
        assert_eq!(store.load().unwrap().expose_secret(), "tok");

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn holding_starts_populated() {
        let store = MemoryTokenStore::holding("tok");
        assert!(store.load().is_some());
    }
}
