// Behavior tests for `SessionStore`: bootstrap rehydration, login with
// identity confirmation, logout, and the admission predicates.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopsync_core::{
    Admission, ApiTransport, AuthClient, MemoryTokenStore, SessionStore, TokenStore, admit_admin,
    admit_authenticated,
};

// ── Helpers ─────────────────────────────────────────────────────────

struct Harness {
    server: MockServer,
    transport: Arc<ApiTransport>,
    vault: Arc<MemoryTokenStore>,
}

impl Harness {
    async fn new(vault: MemoryTokenStore) -> Self {
        let server = MockServer::start().await;
        let transport = Arc::new(ApiTransport::new(&server.uri()).unwrap());
        Self {
            server,
            transport,
            vault: Arc::new(vault),
        }
    }

    async fn bootstrap(&self) -> SessionStore {
        SessionStore::bootstrap(
            AuthClient::new(Arc::clone(&self.transport)),
            Arc::clone(&self.transport),
            Arc::clone(&self.vault) as Arc<dyn TokenStore>,
        )
        .await
    }
}

fn me_body(role: &str) -> serde_json::Value {
    json!({ "userId": "u-1", "email": "admin@shop.test", "role": role })
}

// ── Bootstrap ───────────────────────────────────────────────────────

#[tokio::test]
async fn bootstrap_without_stored_token_stays_logged_out() {
    let h = Harness::new(MemoryTokenStore::new()).await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body("ADMIN")))
        .expect(0)
        .mount(&h.server)
        .await;

    let store = h.bootstrap().await;

    let state = store.state();
    assert!(!state.is_authenticated());
    assert!(state.actor.is_none());
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn bootstrap_confirms_stored_token() {
    let h = Harness::new(MemoryTokenStore::holding("tok-stored")).await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer tok-stored"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body("ADMIN")))
        .expect(1)
        .mount(&h.server)
        .await;

    let store = h.bootstrap().await;

    let state = store.state();
    assert!(state.is_authenticated());
    assert!(state.is_admin());
    assert_eq!(state.actor.unwrap().email, "admin@shop.test");
    assert!(h.vault.load().is_some());
}

#[tokio::test]
async fn bootstrap_with_unconfirmable_token_silently_clears_session() {
    let h = Harness::new(MemoryTokenStore::holding("tok-expired")).await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;

    let store = h.bootstrap().await;

    let state = store.state();
    assert!(!state.is_authenticated());
    assert!(state.actor.is_none());
    // Boot-time failure is silent: no error surfaced to the UI.
    assert_eq!(state.error, None);
    // The durable slot and the transport bearer are both gone.
    assert!(h.vault.load().is_none());
    assert!(!h.transport.has_bearer());
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn login_persists_and_confirms_the_token() {
    let h = Harness::new(MemoryTokenStore::new()).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "admin@shop.test",
            "password": "hunter2"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "accessToken": "tok-fresh" })),
        )
        .mount(&h.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer tok-fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body("ADMIN")))
        .mount(&h.server)
        .await;

    let store = h.bootstrap().await;
    let ok = store
        .login("admin@shop.test", &SecretString::from("hunter2"))
        .await;

    assert!(ok);
    let state = store.state();
    assert!(state.is_authenticated());
    assert!(state.is_admin());
    assert_eq!(state.error, None);
    assert!(!state.loading());
    assert_eq!(h.vault.load().unwrap().expose_secret(), "tok-fresh");
}

#[tokio::test]
async fn login_with_bad_credentials_fails_clean() {
    let h = Harness::new(MemoryTokenStore::new()).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;

    let store = h.bootstrap().await;
    let ok = store
        .login("admin@shop.test", &SecretString::from("wrong"))
        .await;

    assert!(!ok);
    let state = store.state();
    assert!(!state.is_authenticated());
    assert_eq!(
        state.error.as_deref(),
        Some("Your session is invalid or has expired. Please sign in again.")
    );
    assert!(h.vault.load().is_none());
}

#[tokio::test]
async fn login_with_unconfirmable_token_is_a_full_logout() {
    let h = Harness::new(MemoryTokenStore::new()).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "accessToken": "tok-odd" })),
        )
        .mount(&h.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;

    let store = h.bootstrap().await;
    let ok = store
        .login("admin@shop.test", &SecretString::from("hunter2"))
        .await;

    // The token exchange succeeded, but a token that cannot be confirmed
    // is not a session: everything rolls back and the command fails.
    assert!(!ok);
    let state = store.state();
    assert!(!state.is_authenticated());
    assert!(state.actor.is_none());
    assert!(state.error.is_some());
    assert!(h.vault.load().is_none());
    assert!(!h.transport.has_bearer());
}

// ── Logout ──────────────────────────────────────────────────────────

#[tokio::test]
async fn logout_clears_state_vault_and_bearer() {
    let h = Harness::new(MemoryTokenStore::holding("tok-stored")).await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body("ADMIN")))
        .mount(&h.server)
        .await;

    let store = h.bootstrap().await;
    assert!(store.state().is_authenticated());

    store.logout();

    let state = store.state();
    assert!(!state.is_authenticated());
    assert!(state.actor.is_none());
    assert_eq!(state.error, None);
    assert!(h.vault.load().is_none());
    assert!(!h.transport.has_bearer());
}

// ── Admission predicates ────────────────────────────────────────────

#[tokio::test]
async fn admission_follows_role() {
    let h = Harness::new(MemoryTokenStore::holding("tok-stored")).await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body("CUSTOMER")))
        .mount(&h.server)
        .await;

    let store = h.bootstrap().await;
    let state = store.state();

    assert_eq!(admit_authenticated(&state), Admission::Granted);
    // Authenticated but not privileged: redirected away, not to login.
    assert_eq!(admit_admin(&state), Admission::Forbidden);

    store.logout();
    let state = store.state();
    assert_eq!(admit_authenticated(&state), Admission::RequiresLogin);
    assert_eq!(admit_admin(&state), Admission::RequiresLogin);
}
