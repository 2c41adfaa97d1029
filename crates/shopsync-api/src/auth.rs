// Auth resource client
//
// Token exchange (POST /auth/login) and identity confirmation
// (GET /auth/me). Login only returns the credential; confirming it and
// installing it on the transport is the session store's job.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::model::{Actor, Role};
use crate::transport::ApiTransport;

// ── Wire shapes ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginWire {
    access_token: String,
}

// The identity endpoint has been observed with either `id` or `userId`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActorWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    email: String,
    role: Role,
}

impl ActorWire {
    fn normalize(self) -> Result<Actor, Error> {
        let id = self
            .id
            .or(self.user_id)
            .ok_or_else(|| Error::Deserialization {
                message: "actor payload has neither `id` nor `userId`".into(),
                body: String::new(),
            })?;

        Ok(Actor {
            id,
            email: self.email,
            role: self.role,
        })
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Typed client for the auth endpoints.
#[derive(Clone)]
pub struct AuthClient {
    transport: Arc<ApiTransport>,
}

impl AuthClient {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    /// Exchange credentials for an access token.
    ///
    /// Any non-2xx response propagates as [`Error::Api`]; the caller
    /// decides how to surface it.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<SecretString, Error> {
        debug!("logging in as {email}");

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let wire: LoginWire = self.transport.post("auth/login", &body).await?;
        Ok(SecretString::from(wire.access_token))
    }

    /// Confirm the installed credential and fetch the actor behind it.
    ///
    /// Fails with a 401-shaped [`Error::Api`] when the token is invalid
    /// or expired -- the session store treats that as confirmation failure.
    pub async fn me(&self) -> Result<Actor, Error> {
        let wire: ActorWire = self.transport.get("auth/me").await?;
        wire.normalize()
    }
}
