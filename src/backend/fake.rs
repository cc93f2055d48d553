// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    io,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use futures_util::lock::Mutex;
use secrecy::{ExposeSecret as _, SecretString};
use tokio::sync::Notify;

use crate::{
    error::{self, Result},
    prices::{BasePrices, District, LastUpdated, PriceDocument},
    session::{Credentials, Token},
};

use super::Backend;

struct Gate {
    entered: Notify,
    open: Notify,
}

/// In-memory stand-in for the price list service. The password `wrong` is
/// rejected the way the real service rejects bad credentials.
pub(crate) struct Fake {
    stored: Mutex<PriceDocument>,
    failing_gets: AtomicUsize,
    put_rejection: Mutex<Option<Option<String>>>,
    last_token: Mutex<Option<String>>,
    gate: Option<Gate>,
    gate_fetches: bool,
    logins: AtomicUsize,
    gets: AtomicUsize,
    puts: AtomicUsize,
}

impl Fake {
    pub(crate) const TOKEN: &'static str = "token-123";
    pub(crate) const SAVED_AT: &'static str = "2024-05-01T12:00:00Z";

    pub(crate) fn new() -> Self {
        Self {
            stored: Mutex::new(Self::initial_document()),
            failing_gets: AtomicUsize::new(0),
            put_rejection: Mutex::new(None),
            last_token: Mutex::new(None),
            gate: None,
            gate_fetches: false,
            logins: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
        }
    }

    pub(crate) fn initial_document() -> PriceDocument {
        PriceDocument {
            base_prices: BasePrices {
                p8: 15000,
                p10: 14800,
                p12: 14500,
            },
            districts: vec![
                District {
                    name: "Merkez".to_owned(),
                    cost: 0,
                },
                District {
                    name: "Kartal".to_owned(),
                    cost: 250,
                },
            ],
            last_updated: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Holds logins and saves until [`Fake::open`] is called.
    pub(crate) fn gated(mut self) -> Self {
        self.gate = Some(Gate {
            entered: Notify::new(),
            open: Notify::new(),
        });
        self
    }

    /// Makes the gate hold fetches too.
    pub(crate) fn gating_fetches(mut self) -> Self {
        self.gate_fetches = true;
        self
    }

    pub(crate) async fn wait_until_entered(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notified().await;
        }
    }

    pub(crate) fn open(&self) {
        if let Some(gate) = &self.gate {
            gate.open.notify_one();
        }
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.open.notified().await;
        }
    }

    /// Makes the next `count` fetches fail as if the server were unreachable.
    pub(crate) fn fail_gets(&self, count: usize) {
        self.failing_gets.store(count, Ordering::SeqCst);
    }

    /// Makes the next save fail with a 401 carrying `message`.
    pub(crate) async fn reject_next_put(&self, message: Option<&str>) {
        *self.put_rejection.lock().await = Some(message.map(str::to_owned));
    }

    pub(crate) async fn stored(&self) -> PriceDocument {
        self.stored.lock().await.clone()
    }

    pub(crate) async fn last_token(&self) -> Option<String> {
        self.last_token.lock().await.clone()
    }

    pub(crate) fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub(crate) fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub(crate) fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for Fake {
    async fn login(&self, credentials: &Credentials) -> Result<Token> {
        _ = self.logins.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;

        if credentials.password.expose_secret() == "wrong" {
            return Err(error::Api::Rejected {
                status: 401,
                message: Some("Giriş başarısız".to_owned()),
            }
            .into());
        }
        Ok(SecretString::new(Self::TOKEN.to_owned()))
    }

    async fn get_prices(&self) -> Result<PriceDocument> {
        _ = self.gets.fetch_add(1, Ordering::SeqCst);
        if self.gate_fetches {
            self.pass_gate().await;
        }

        let failing = self
            .failing_gets
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused").into());
        }
        Ok(self.stored().await)
    }

    async fn put_prices(&self, document: &PriceDocument, token: &Token) -> Result<PriceDocument> {
        _ = self.puts.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().await = Some(token.expose_secret().clone());
        self.pass_gate().await;

        if let Some(message) = self.put_rejection.lock().await.take() {
            return Err(error::Api::Rejected {
                status: 401,
                message,
            }
            .into());
        }

        let mut saved = document.clone();
        saved.last_updated = Some(LastUpdated::Text(Self::SAVED_AT.to_owned()));
        *self.stored.lock().await = saved.clone();
        Ok(saved)
    }
}
