// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use futures_util::lock::Mutex;
use log::{debug, info, warn};
use secrecy::SecretString;

use crate::{
    backend::Backend,
    busy,
    error::{Error, Result},
    feedback,
};

pub(crate) const LOGIN_SUCCEEDED: &str = "Giriş başarılı!";
pub(crate) const LOGIN_FAILED: &str = "Giriş başarısız";
pub(crate) const LOGGED_OUT: &str = "Çıkış yapıldı";

/// Bearer token issued by the backend at login.
pub(crate) type Token = SecretString;

pub(crate) struct Credentials {
    pub(crate) username: String,
    pub(crate) password: SecretString,
}

impl Credentials {
    pub(crate) fn new<S: Into<String>>(username: S, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

#[derive(Clone)]
pub(crate) struct Data {
    username: Option<String>,
    token: Option<Token>,
}

impl Default for Data {
    fn default() -> Self {
        Self::new_unauthenticated()
    }
}

impl Data {
    pub(crate) const fn new_unauthenticated() -> Self {
        Self {
            username: None,
            token: None,
        }
    }

    pub(crate) const fn new_authenticated(username: String, token: Token) -> Self {
        Self {
            username: Some(username),
            token: Some(token),
        }
    }

    pub(crate) const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) const fn username(&self) -> &Option<String> {
        &self.username
    }

    pub(crate) const fn token(&self) -> &Option<Token> {
        &self.token
    }
}

/// Owns the operator's session. Only one login request may be outstanding at
/// a time.
#[derive(Default)]
pub(crate) struct Manager {
    data: Mutex<Data>,
    submitting: busy::Flag,
}

impl Manager {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn login<B: Backend + ?Sized>(
        &self,
        backend: &B,
        credentials: Credentials,
        feedback: &feedback::Channel,
    ) -> Result<()> {
        let Some(_submitting) = self.submitting.try_acquire() else {
            debug!("Ignoring login for {} while another is in progress", credentials.username);
            return Err(Error::Busy);
        };

        info!("Logging in as {}", credentials.username);
        match backend.login(&credentials).await {
            Ok(token) => {
                *self.data.lock().await = Data::new_authenticated(credentials.username, token);
                feedback.success(LOGIN_SUCCEEDED);
                Ok(())
            }
            Err(err) => {
                warn!("Login as {} failed: {}", credentials.username, err);
                feedback.error(err.feedback_text(LOGIN_FAILED));
                Err(err)
            }
        }
    }

    /// Forgets the token and username. Never touches the network.
    pub(crate) async fn logout(&self, feedback: &feedback::Channel) {
        let previous = std::mem::take(&mut *self.data.lock().await);
        if let Some(username) = previous.username() {
            info!("Logged out {}", username);
        }
        feedback.info(LOGGED_OUT);
    }

    pub(crate) async fn data(&self) -> Data {
        self.data.lock().await.clone()
    }

    pub(crate) async fn token(&self) -> Option<Token> {
        self.data.lock().await.token().clone()
    }

    pub(crate) fn is_submitting(&self) -> bool {
        self.submitting.is_set()
    }
}
