//! CRM session authentication
//!
//! The legacy amoCRM API authenticates with a login/hash pair posted to
//! `auth.php`, answering with a `session_id` cookie that must accompany
//! every later call. [`AuthClient`] owns that cookie: it logs in on first
//! use and hands out the cached token afterwards. There is no expiry
//! handling; a stale token shows up as failing requests.

use std::fmt;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::CrmError;

/// Name of the cookie carrying the session
pub const SESSION_COOKIE: &str = "session_id";

/// Path of the login endpoint, relative to the account URL
pub const AUTH_PATH: &str = "/private/api/auth.php?type=json";

/// Opaque CRM session token
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The token produced by a failed login
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Cookie` request header
    pub fn cookie_header(&self) -> String {
        format!("{SESSION_COOKIE}={}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("SessionToken(<empty>)")
        } else {
            f.write_str("SessionToken(<redacted>)")
        }
    }
}

/// Logs in to the CRM and caches the session token
///
/// Authentication is serialized through an async mutex, so concurrent
/// callers racing on the first call log in only once.
pub struct AuthClient {
    http: reqwest::Client,
    endpoint: String,
    user_login: String,
    user_hash: String,
    token: Mutex<Option<SessionToken>>,
}

impl AuthClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        user_login: impl Into<String>,
        user_hash: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), AUTH_PATH),
            user_login: user_login.into(),
            user_hash: user_hash.into(),
            token: Mutex::new(None),
        }
    }

    /// Returns the cached session token, logging in first if there is none
    ///
    /// A failed login yields an empty token rather than an error; it is not
    /// cached, so the next call tries again.
    #[instrument(skip(self), fields(user = %self.user_login))]
    pub async fn authenticate(&self) -> SessionToken {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            debug!("Reusing cached CRM session");
            return token.clone();
        }

        match self.login().await {
            Ok(token) => {
                info!("Authenticated with CRM");
                *cached = Some(token.clone());
                token
            }
            Err(error) => {
                warn!(%error, "CRM authentication failed, continuing without a session");
                SessionToken::empty()
            }
        }
    }

    /// Returns true once a session has been cached
    pub async fn is_authenticated(&self) -> bool {
        self.token.lock().await.is_some()
    }

    async fn login(&self) -> Result<SessionToken, CrmError> {
        let response = self
            .http
            .post(&self.endpoint)
            .form(&[
                ("USER_LOGIN", self.user_login.as_str()),
                ("USER_HASH", self.user_hash.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrmError::Status {
                status: status.as_u16(),
                path: AUTH_PATH.to_string(),
            });
        }

        let token = response
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(|cookie| SessionToken::new(cookie.value()));

        match token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(CrmError::unexpected("login response carried no session cookie")),
        }
    }
}

impl fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClient")
            .field("endpoint", &self.endpoint)
            .field("user_login", &self.user_login)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header() {
        let token = SessionToken::new("abc123");
        assert_eq!(token.cookie_header(), "session_id=abc123");
    }

    #[test]
    fn test_debug_never_prints_token() {
        assert_eq!(format!("{:?}", SessionToken::new("abc123")), "SessionToken(<redacted>)");
        assert_eq!(format!("{:?}", SessionToken::empty()), "SessionToken(<empty>)");
    }
}
