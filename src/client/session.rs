// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session provider capability for the controller

use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};
use url::Url;

const AUTH_TOKEN_PARAM: &str = "auth_token";
const REFRESH_TOKEN_PARAM: &str = "refresh_token";

/// An authenticated user session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            refresh_token: None,
        }
    }
}

/// Answers "is there a valid session" for the controller
pub trait SessionProvider: Send + Sync {
    fn current(&self) -> Option<Session>;

    /// Remember where to return after the user signs in
    fn remember_redirect(&self, _path: &str) {}
}

/// Fixed session, signed in or not
#[derive(Debug, Clone, Default)]
pub struct StaticSession(Option<Session>);

impl StaticSession {
    pub fn signed_in(token: impl Into<String>) -> Self {
        Self(Some(Session::new(token)))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl SessionProvider for StaticSession {
    fn current(&self) -> Option<Session> {
        self.0.clone()
    }
}

#[derive(Debug, Default)]
struct Stored {
    session: Option<Session>,
    login_redirect: Option<String>,
}

/// Mutable session store fed by the login flow
#[derive(Debug, Default)]
pub struct StoredSession {
    inner: RwLock<Stored>,
}

impl StoredSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, session: Session) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .session = Some(session);
    }

    pub fn sign_out(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .session = None;
    }

    /// Take the saved post-login destination, clearing it
    pub fn take_redirect(&self) -> Option<String> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .login_redirect
            .take()
    }

    /// Consume a login callback URL.
    ///
    /// When the URL carries `auth_token` (and optionally `refresh_token`) the
    /// session is stored and the URL is returned with both parameters removed.
    /// Returns `Ok(None)` when the URL holds no token.
    pub fn ingest_callback(&self, callback: &str) -> Result<Option<String>, url::ParseError> {
        let mut url = Url::parse(callback)?;

        let mut token = None;
        let mut refresh_token = None;
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter_map(|(k, v)| match k.as_ref() {
                AUTH_TOKEN_PARAM => {
                    token = Some(v.into_owned());
                    None
                }
                REFRESH_TOKEN_PARAM => {
                    refresh_token = Some(v.into_owned()).filter(|t| !t.is_empty());
                    None
                }
                _ => Some((k.into_owned(), v.into_owned())),
            })
            .collect();

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            debug!("Login callback without auth token");
            return Ok(None);
        };

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }

        info!("Session established from login callback");
        self.sign_in(Session {
            token,
            refresh_token,
        });
        Ok(Some(url.to_string()))
    }
}

impl SessionProvider for StoredSession {
    fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .session
            .clone()
    }

    fn remember_redirect(&self, path: &str) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .login_redirect = Some(path.to_string());
    }
}
