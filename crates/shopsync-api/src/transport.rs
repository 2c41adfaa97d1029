// Shared transport for the shopsync resource clients.
//
// Owns the reqwest::Client, the normalized base URL, and the bearer-token
// slot. Auth and product clients share one transport so a token installed
// after login is carried by every subsequent request.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, ServerMessage};

/// Default request timeout. The store layer imposes no timeout of its
/// own; a hung call is bounded here or not at all.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<ServerMessage>,
}

// ── Transport ────────────────────────────────────────────────────────

/// HTTP transport shared by [`AuthClient`](crate::AuthClient) and
/// [`ProductsClient`](crate::ProductsClient).
///
/// Requests carry `Authorization: Bearer <token>` whenever a token is
/// installed via [`set_bearer`](Self::set_bearer). The slot is written by
/// the session store on login/logout and read on every request.
#[derive(Debug)]
pub struct ApiTransport {
    http: reqwest::Client,
    base_url: Url,
    bearer: RwLock<Option<SecretString>>,
}

impl ApiTransport {
    /// Build a transport for the API at `base_url` with the default timeout.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Build a transport with an explicit request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("shopsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            bearer: RwLock::new(None),
        })
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Bearer token slot ────────────────────────────────────────────

    /// Install the session token. Subsequent requests send it as a
    /// bearer Authorization header.
    pub fn set_bearer(&self, token: SecretString) {
        *self.bearer.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Remove the session token. Subsequent requests are anonymous.
    pub fn clear_bearer(&self) {
        *self.bearer.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a token is currently installed.
    pub fn has_bearer(&self) -> bool {
        self.bearer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.bearer.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => req.bearer_auth(token.expose_secret()),
            None => req,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"products/search"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining a relative path works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.authorize(self.http.get(url)).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");

        let resp = self.authorize(self.http.get(url)).query(params).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url)).json(body).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PATCH {url}");

        let resp = self.authorize(self.http.patch(url)).json(body).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        debug!("DELETE {url}");

        let resp = self.authorize(self.http.delete(url)).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(|b| b.message);

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Parse and normalize the base URL so relative joins behave: the path
/// always ends with a single `/`.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let t = ApiTransport::new("http://localhost:3000").unwrap();
        assert_eq!(t.base_url().as_str(), "http://localhost:3000/");
    }

    #[test]
    fn base_url_keeps_prefix_path() {
        let t = ApiTransport::new("http://localhost:3000/api/v1/").unwrap();
        assert_eq!(t.base_url().as_str(), "http://localhost:3000/api/v1/");
        assert_eq!(
            t.url("products/search").as_str(),
            "http://localhost:3000/api/v1/products/search"
        );
    }

    #[test]
    fn bearer_slot_roundtrip() {
        let t = ApiTransport::new("http://localhost:3000").unwrap();
        assert!(!t.has_bearer());

        t.set_bearer(SecretString::from("tok-123"));
        assert!(t.has_bearer());

        t.clear_bearer();
        assert!(!t.has_bearer());
    }
}
