// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{debug, warn};

use crate::{
    backend::Backend,
    error::{Error, Result},
    feedback,
    prices::{BaseKey, District, DistrictField, PriceDocument},
    session::{self, Credentials},
    sync,
};

/// Everything the operator works with: the session, the local price list and
/// the feedback line, bound to one backend.
pub(crate) struct Panel<B: Backend> {
    backend: B,
    session: session::Manager,
    sync: sync::Service,
    feedback: feedback::Channel,
}

impl<B: Backend> Panel<B> {
    pub(crate) fn new(backend: B, feedback: feedback::Channel) -> Self {
        Self {
            backend,
            session: session::Manager::new(),
            sync: sync::Service::new(),
            feedback,
        }
    }

    /// Logs in and, on success, loads the price list. A failed initial fetch
    /// is reported through feedback but does not undo the login.
    pub(crate) async fn login(&self, credentials: Credentials) -> Result<()> {
        self.session
            .login(&self.backend, credentials, &self.feedback)
            .await?;

        if let Err(err) = self.sync.fetch_prices(&self.backend, &self.feedback).await {
            debug!("Logged in without a price list: {}", err);
        }
        Ok(())
    }

    pub(crate) async fn logout(&self) {
        self.session.logout(&self.feedback).await;
        self.sync.discard().await;
    }

    pub(crate) async fn fetch_prices(&self) -> Result<()> {
        self.sync.fetch_prices(&self.backend, &self.feedback).await
    }

    pub(crate) async fn save_prices(&self) -> Result<PriceDocument> {
        let Some(token) = self.session.token().await else {
            warn!("Refusing to save without a session");
            let err = Error::NotAuthenticated;
            self.feedback.error(err.feedback_text(sync::SAVE_FAILED));
            return Err(err);
        };

        self.sync
            .save_prices(&self.backend, &token, &self.feedback)
            .await
    }

    /// Returns the stored value, or `None` if no price list is loaded.
    pub(crate) async fn set_base_price(&self, key: BaseKey, raw: &str) -> Option<u64> {
        self.sync.edit(|doc| doc.set_base_price(key, raw)).await
    }

    /// Returns `false` if no price list is loaded or `index` is out of range.
    pub(crate) async fn set_district_field(
        &self,
        index: usize,
        field: DistrictField,
        raw: &str,
    ) -> bool {
        self.sync
            .edit(|doc| doc.set_district_field(index, field, raw))
            .await
            .unwrap_or(false)
    }

    pub(crate) async fn add_district(&self) -> Option<usize> {
        self.sync.edit(PriceDocument::add_district).await
    }

    pub(crate) async fn remove_district(&self, index: usize) -> Option<District> {
        self.sync
            .edit(|doc| doc.remove_district(index))
            .await
            .flatten()
    }

    pub(crate) async fn document(&self) -> Option<PriceDocument> {
        self.sync.document().await
    }

    pub(crate) async fn session(&self) -> session::Data {
        self.session.data().await
    }

    pub(crate) async fn is_authenticated(&self) -> bool {
        self.session.data().await.is_authenticated()
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.session.is_submitting() || self.sync.is_saving()
    }

    pub(crate) const fn feedback(&self) -> &feedback::Channel {
        &self.feedback
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use secrecy::SecretString;

    use crate::backend::fake::Fake;

    use super::*;

    fn panel() -> (Arc<Fake>, Panel<Arc<Fake>>) {
        let backend = Arc::new(Fake::new());
        let panel = Panel::new(Arc::clone(&backend), feedback::Channel::default());
        (backend, panel)
    }

    fn credentials(password: &str) -> Credentials {
        Credentials::new("admin", SecretString::new(password.to_owned()))
    }

    fn feedback_of<B: Backend>(panel: &Panel<B>) -> Option<(feedback::Kind, String)> {
        panel.feedback().current().map(|m| (m.kind, m.text))
    }

    #[tokio::test]
    async fn login_loads_prices_once() -> Result<()> {
        let (backend, panel) = panel();
        assert_eq!(panel.document().await, None);

        panel.login(credentials("secret")).await?;

        assert!(panel.is_authenticated().await);
        assert_eq!(backend.gets(), 1);
        assert_eq!(panel.document().await, Some(Fake::initial_document()));
        assert_eq!(
            feedback_of(&panel),
            Some((feedback::Kind::Success, session::LOGIN_SUCCEEDED.to_owned()))
        );
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_stays_logged_out() {
        let (backend, panel) = panel();

        let result = panel.login(credentials("wrong")).await;

        assert!(result.is_err());
        assert!(!panel.is_authenticated().await);
        assert_eq!(backend.gets(), 0);
        assert_eq!(panel.document().await, None);
        assert_eq!(
            feedback_of(&panel),
            Some((feedback::Kind::Error, "Giriş başarısız".to_owned()))
        );
    }

    #[tokio::test]
    async fn login_survives_failed_initial_fetch() -> Result<()> {
        let (backend, panel) = panel();
        backend.fail_gets(1);

        panel.login(credentials("secret")).await?;

        assert!(panel.is_authenticated().await);
        assert_eq!(panel.document().await, None);
        assert_eq!(
            feedback_of(&panel),
            Some((feedback::Kind::Error, sync::FETCH_FAILED.to_owned()))
        );

        panel.fetch_prices().await?;
        assert!(panel.document().await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn edits_stay_local_until_saved() -> Result<()> {
        let (backend, panel) = panel();
        panel.login(credentials("secret")).await?;

        assert_eq!(panel.set_base_price(BaseKey::P8, "1500").await, Some(1500));
        assert_eq!(panel.set_base_price(BaseKey::P8, "abc").await, Some(0));
        let index = panel.add_district().await;
        assert_eq!(index, Some(2));
        assert!(panel.set_district_field(2, DistrictField::Name, "Pendik").await);
        assert!(panel.set_district_field(2, DistrictField::Cost, "300").await);
        assert_eq!(
            panel.remove_district(0).await.map(|d| d.name),
            Some("Merkez".to_owned())
        );

        assert_eq!(backend.stored().await, Fake::initial_document());
        assert_eq!(backend.gets(), 1);
        assert_eq!(backend.puts(), 0);

        _ = panel.save_prices().await?;

        let stored = backend.stored().await;
        assert_eq!(stored.base_prices.p8, 0);
        assert_eq!(
            stored
                .districts
                .iter()
                .map(|d| (d.name.as_str(), d.cost))
                .collect::<Vec<_>>(),
            [("Kartal", 250), ("Pendik", 300)]
        );
        assert_eq!(panel.document().await, Some(stored));
        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_edits_are_ignored() -> Result<()> {
        let (_, panel) = panel();
        panel.login(credentials("secret")).await?;

        assert!(!panel.set_district_field(9, DistrictField::Cost, "1").await);
        assert_eq!(panel.remove_district(9).await, None);
        assert_eq!(panel.document().await, Some(Fake::initial_document()));
        Ok(())
    }

    #[tokio::test]
    async fn edits_without_document_are_ignored() {
        let (_, panel) = panel();

        assert_eq!(panel.set_base_price(BaseKey::P8, "1").await, None);
        assert_eq!(panel.add_district().await, None);
        assert_eq!(panel.remove_district(0).await, None);
        assert!(!panel.set_district_field(0, DistrictField::Name, "x").await);
    }

    #[tokio::test]
    async fn save_then_failed_refresh_reports_refresh_error() -> Result<()> {
        let (backend, panel) = panel();
        panel.login(credentials("secret")).await?;
        _ = panel.set_base_price(BaseKey::P12, "14000").await;

        backend.fail_gets(1);
        _ = panel.save_prices().await?;

        assert_eq!(
            feedback_of(&panel),
            Some((feedback::Kind::Error, sync::FETCH_FAILED.to_owned()))
        );
        assert_eq!(
            panel.document().await.map(|d| d.base_prices.p12),
            Some(14000)
        );
        Ok(())
    }

    #[tokio::test]
    async fn save_requires_session() {
        let (backend, panel) = panel();
        _ = panel.fetch_prices().await;

        let result = panel.save_prices().await;

        assert!(matches!(result, Err(Error::NotAuthenticated)));
        assert_eq!(backend.puts(), 0);
        assert_eq!(
            feedback_of(&panel),
            Some((feedback::Kind::Error, sync::SAVE_FAILED.to_owned()))
        );
    }

    #[tokio::test]
    async fn logout_discards_everything() -> Result<()> {
        let (_, panel) = panel();
        panel.login(credentials("secret")).await?;

        panel.logout().await;

        assert!(!panel.is_authenticated().await);
        assert!(panel.session().await.username().is_none());
        assert_eq!(panel.document().await, None);
        assert_eq!(
            feedback_of(&panel),
            Some((feedback::Kind::Info, session::LOGGED_OUT.to_owned()))
        );
        Ok(())
    }

    #[tokio::test]
    async fn refresh_finishing_after_logout_is_dropped() -> Result<()> {
        let backend = Arc::new(Fake::new().gated());
        let panel = Panel::new(Arc::clone(&backend), feedback::Channel::default());
        let login = async {
            backend.wait_until_entered().await;
            backend.open();
        };
        let (result, ()) = tokio::join!(panel.login(credentials("secret")), login);
        result?;

        // The save holds at the gate; log out underneath it.
        let save = panel.save_prices();
        let logout = async {
            backend.wait_until_entered().await;
            panel.logout().await;
            backend.open();
        };
        let (result, ()) = tokio::join!(save, logout);

        assert!(result.is_ok());
        assert_eq!(backend.gets(), 2);
        assert_eq!(panel.document().await, None);
        Ok(())
    }
}
