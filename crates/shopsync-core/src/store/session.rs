// ── Session store ──
//
// Owns the credential lifecycle: login exchanges credentials for a
// token, persists it, and immediately confirms it against /auth/me.
// A token that cannot be confirmed is not a session; confirmation
// failure rolls everything back to logged-out, durable slot included.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use shopsync_api::{Actor, ApiTransport, AuthClient, Role};

use super::cell::StoreCell;
use crate::friendly::friendly_error;
use crate::token::TokenStore;

// ── State ────────────────────────────────────────────────────────────

/// Snapshot of the session.
///
/// `actor` is only ever present alongside a token; the converse does not
/// hold -- between token exchange and identity confirmation the token
/// exists alone.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    token: Option<SecretString>,
    pub actor: Option<Actor>,
    /// Failure message from the last interactive command. Boot-time
    /// confirmation failures never set this.
    pub error: Option<String>,
    pending: u32,
}

impl SessionState {
    /// Guard predicate: a credential is held (confirmed or not).
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Guard predicate: the confirmed actor has the admin role.
    pub fn is_admin(&self) -> bool {
        self.actor.as_ref().is_some_and(|a| a.role == Role::Admin)
    }

    /// `true` while a login is outstanding.
    pub fn loading(&self) -> bool {
        self.pending > 0
    }
}

// ── Store ────────────────────────────────────────────────────────────

/// Reactive store for the authentication session.
///
/// Shares its [`ApiTransport`] with the resource clients: installing or
/// clearing the bearer token here changes what every other request sends.
pub struct SessionStore {
    auth: AuthClient,
    transport: Arc<ApiTransport>,
    vault: Arc<dyn TokenStore>,
    cell: StoreCell<SessionState>,
}

impl SessionStore {
    /// Create a logged-out store. Prefer [`bootstrap`](Self::bootstrap),
    /// which also rehydrates a previously persisted session.
    pub fn new(
        auth: AuthClient,
        transport: Arc<ApiTransport>,
        vault: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            auth,
            transport,
            vault,
            cell: StoreCell::new(SessionState::default()),
        }
    }

    /// Create the store and rehydrate the persisted session, if any.
    ///
    /// A stored token is installed and confirmed once; if confirmation
    /// fails the session is silently cleared -- no error is surfaced at
    /// boot, only interactive commands set `error`.
    pub async fn bootstrap(
        auth: AuthClient,
        transport: Arc<ApiTransport>,
        vault: Arc<dyn TokenStore>,
    ) -> Self {
        let store = Self::new(auth, transport, vault);

        if let Some(token) = store.vault.load() {
            store.transport.set_bearer(token.clone());
            store.cell.update(|s| s.token = Some(token));

            match store.auth.me().await {
                Ok(actor) => {
                    debug!("rehydrated session for {}", actor.email);
                    store.cell.update(|s| s.actor = Some(actor));
                }
                Err(err) => {
                    debug!("stored token failed confirmation: {err}");
                    store.clear_session();
                }
            }
        }

        store
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.cell.snapshot()
    }

    /// Subscribe to state changes.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.cell.subscribe()
    }

    /// Subscribe as a `Stream` of snapshots.
    pub fn stream(&self) -> WatchStream<SessionState> {
        self.cell.stream()
    }

    /// The confirmed actor, if any.
    pub fn actor(&self) -> Option<Actor> {
        self.cell.snapshot().actor
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Log in and confirm the resulting token.
    ///
    /// Returns `true` only when both the token exchange and the identity
    /// confirmation succeed. A token the server will not confirm is
    /// treated as no session at all: everything is rolled back and the
    /// command fails with the translated error.
    pub async fn login(&self, email: &str, password: &SecretString) -> bool {
        self.cell.update(|s| {
            s.pending += 1;
            s.error = None;
        });

        let token = match self.auth.login(email, password).await {
            Ok(token) => token,
            Err(err) => {
                self.fail(&err);
                return false;
            }
        };

        self.vault.save(&token);
        self.transport.set_bearer(token.clone());
        self.cell.update(|s| s.token = Some(token));

        match self.auth.me().await {
            Ok(actor) => {
                self.cell.update(|s| {
                    s.pending = s.pending.saturating_sub(1);
                    s.actor = Some(actor);
                });
                true
            }
            Err(err) => {
                self.clear_session();
                self.fail(&err);
                false
            }
        }
    }

    /// Log out: clear the token, the actor, the durable slot, and the
    /// transport bearer. Synchronous, no network call.
    pub fn logout(&self) {
        self.clear_session();
        self.cell.update(|s| s.error = None);
    }

    // ── Internals ────────────────────────────────────────────────────

    fn clear_session(&self) {
        self.vault.clear();
        self.transport.clear_bearer();
        self.cell.update(|s| {
            s.token = None;
            s.actor = None;
        });
    }

    fn fail(&self, err: &shopsync_api::Error) {
        let message = friendly_error(err);
        debug!("session command failed: {message}");
        self.cell.update(|s| {
            s.pending = s.pending.saturating_sub(1);
            s.error = Some(message);
        });
    }
}
