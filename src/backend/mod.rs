// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#[cfg(test)]
pub(crate) mod fake;
mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::Result,
    prices::PriceDocument,
    session::{Credentials, Token},
};

pub(crate) use http::Http;

/// The price list service.
#[async_trait]
pub(crate) trait Backend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Token>;

    async fn get_prices(&self) -> Result<PriceDocument>;

    async fn put_prices(&self, document: &PriceDocument, token: &Token) -> Result<PriceDocument>;
}

#[async_trait]
impl<T: Backend + ?Sized> Backend for Arc<T> {
    async fn login(&self, credentials: &Credentials) -> Result<Token> {
        (**self).login(credentials).await
    }

    async fn get_prices(&self) -> Result<PriceDocument> {
        (**self).get_prices().await
    }

    async fn put_prices(&self, document: &PriceDocument, token: &Token) -> Result<PriceDocument> {
        (**self).put_prices(document, token).await
    }
}
