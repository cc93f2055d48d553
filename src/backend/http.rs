// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::{
    error::{self, Result},
    metadata,
    prices::PriceDocument,
    session::{Credentials, Token},
};

use super::Backend;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: SecretString,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Turns a response into a value, or into a rejection carrying the server's
/// `error` text. Bodies that are not JSON are reported as malformed whatever
/// the status.
fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    if status.is_success() {
        return Ok(serde_json::from_slice(body)?);
    }

    let ErrorResponse { error } = serde_json::from_slice(body)?;
    Err(error::Api::Rejected {
        status: status.as_u16(),
        message: error,
    }
    .into())
}

pub(crate) struct Http {
    client: reqwest::Client,
    base: Url,
}

impl Http {
    pub(crate) fn new(base: Url) -> Result<Self> {
        Self::with_builder(reqwest::Client::builder(), base)
    }

    fn with_builder(builder: reqwest::ClientBuilder, mut base: Url) -> Result<Self> {
        // Without the trailing slash, joining would replace the last segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client: builder
                .user_agent(metadata::USER_AGENT.as_str())
                .build()?,
            base,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        debug!("Received {} with {} bytes", status, body.len());
        decode(status, &body)
    }
}

#[async_trait]
impl Backend for Http {
    async fn login(&self, credentials: &Credentials) -> Result<Token> {
        let url = self.endpoint("login")?;
        debug!("POST {}", url);

        let LoginResponse { token } = self
            .send(self.client.post(url).json(&LoginRequest {
                username: &credentials.username,
                password: credentials.password.expose_secret(),
            }))
            .await?;
        Ok(token)
    }

    async fn get_prices(&self) -> Result<PriceDocument> {
        let url = self.endpoint("prices")?;
        debug!("GET {}", url);

        self.send(self.client.get(url)).await
    }

    async fn put_prices(&self, document: &PriceDocument, token: &Token) -> Result<PriceDocument> {
        let url = self.endpoint("prices")?;
        debug!("PUT {}", url);

        self.send(
            self.client
                .put(url)
                .bearer_auth(token.expose_secret())
                .json(document),
        )
        .await
    }
}
