// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::lock::Mutex;
use log::{debug, info, warn};

use crate::{
    backend::Backend,
    busy,
    error::{Error, Result},
    feedback,
    prices::PriceDocument,
    session::Token,
};

pub(crate) const FETCH_FAILED: &str = "Fiyatlar alınamadı";
pub(crate) const SAVE_SUCCEEDED: &str = "Fiyatlar başarıyla güncellendi!";
pub(crate) const SAVE_FAILED: &str = "Güncelleme başarısız";

/// Keeps the local copy of the price list and moves it to and from the
/// backend.
#[derive(Default)]
pub(crate) struct Service {
    document: Mutex<Option<PriceDocument>>,
    saving: busy::Flag,
    // Bumped by `discard`. A fetch or save started under an older epoch must
    // not bring the document back.
    epoch: AtomicU64,
}

impl Service {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replaces the local document with the server's. On failure the local
    /// document is left as it was.
    pub(crate) async fn fetch_prices<B: Backend + ?Sized>(
        &self,
        backend: &B,
        feedback: &feedback::Channel,
    ) -> Result<()> {
        self.fetch_for_epoch(backend, feedback, self.epoch.load(Ordering::Acquire))
            .await
    }

    async fn fetch_for_epoch<B: Backend + ?Sized>(
        &self,
        backend: &B,
        feedback: &feedback::Channel,
        epoch: u64,
    ) -> Result<()> {
        match backend.get_prices().await {
            Ok(document) => {
                let mut local = self.document.lock().await;
                if self.epoch.load(Ordering::Acquire) != epoch {
                    debug!("Dropping prices fetched before the document was discarded");
                    return Ok(());
                }
                debug!(
                    "Fetched {} districts, last updated {:?}",
                    document.districts.len(),
                    document.last_updated
                );
                *local = Some(document);
                Ok(())
            }
            Err(err) => {
                if self.epoch.load(Ordering::Acquire) == epoch {
                    warn!("Fetching prices failed: {}", err);
                    feedback.error(FETCH_FAILED);
                } else {
                    debug!("Fetch started before the document was discarded failed: {}", err);
                }
                Err(err)
            }
        }
    }

    /// Sends the local document and, once the server accepts it, fetches it
    /// back so the server's copy wins. Local edits survive a rejected save.
    pub(crate) async fn save_prices<B: Backend + ?Sized>(
        &self,
        backend: &B,
        token: &Token,
        feedback: &feedback::Channel,
    ) -> Result<PriceDocument> {
        let Some(saving) = self.saving.try_acquire() else {
            debug!("Ignoring save while another is in progress");
            return Err(Error::Busy);
        };
        let epoch = self.epoch.load(Ordering::Acquire);
        let Some(document) = self.document().await else {
            warn!("Nothing to save; no price list is loaded");
            return Err(Error::NoDocument);
        };

        info!("Saving {} districts", document.districts.len());
        let result = backend.put_prices(&document, token).await;
        drop(saving);

        match result {
            Ok(saved) => {
                feedback.success(SAVE_SUCCEEDED);
                if let Err(err) = self.fetch_for_epoch(backend, feedback, epoch).await {
                    debug!("Keeping saved prices after failed refresh: {}", err);
                }
                Ok(saved)
            }
            Err(err) => {
                warn!("Saving prices failed: {}", err);
                feedback.error(err.feedback_text(SAVE_FAILED));
                Err(err)
            }
        }
    }

    /// Applies a local edit. Returns `None` if no document is loaded.
    pub(crate) async fn edit<R: Send, F: FnOnce(&mut PriceDocument) -> R + Send>(
        &self,
        f: F,
    ) -> Option<R> {
        self.document.lock().await.as_mut().map(f)
    }

    pub(crate) async fn discard(&self) {
        let mut local = self.document.lock().await;
        _ = self.epoch.fetch_add(1, Ordering::AcqRel);
        *local = None;
    }

    pub(crate) async fn document(&self) -> Option<PriceDocument> {
        self.document.lock().await.clone()
    }

    pub(crate) fn is_saving(&self) -> bool {
        self.saving.is_set()
    }
}
