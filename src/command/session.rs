// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::error;

use crate::{
    backend::Backend,
    error::{self, Result},
    password,
    session::Credentials,
};

use super::Context;

/// Log in to edit the price list.
#[derive(Debug, Parser)]
pub(crate) struct Login {
    /// The account to log in with. Defaults to the configured username.
    username: Option<String>,
}

#[async_trait]
impl super::Command for Login {
    async fn execute<B: Backend>(self, ctx: &Context<'_, B>) -> Result<()> {
        let Some(username) = self
            .username
            .or_else(|| ctx.default_username.map(str::to_owned))
        else {
            error!("No username given and none configured");
            return Err(error::Error::Command);
        };

        let password = ctx
            .prompt
            .prompt(password::Request::new(username.as_str()))
            .await?
            .ok_or(error::Password::NoPrompt)?;

        ctx.panel
            .login(Credentials::new(username, password))
            .await
    }
}

/// Log out and discard the loaded price list, including unsaved changes.
#[derive(Debug, Parser)]
pub(crate) struct Logout {}

#[async_trait]
impl super::Command for Logout {
    async fn execute<B: Backend>(self, ctx: &Context<'_, B>) -> Result<()> {
        ctx.panel.logout().await;
        Ok(())
    }
}
