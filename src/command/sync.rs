// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{backend::Backend, error::Result};

use super::Context;

/// Reload the price list from the server, dropping unsaved changes.
#[derive(Debug, Parser)]
pub(crate) struct Fetch {}

#[async_trait]
impl super::Command for Fetch {
    async fn execute<B: Backend>(self, ctx: &Context<'_, B>) -> Result<()> {
        ctx.panel.fetch_prices().await
    }
}

/// Send the edited price list to the server.
#[derive(Debug, Parser)]
pub(crate) struct Save {}

#[async_trait]
impl super::Command for Save {
    async fn execute<B: Backend>(self, ctx: &Context<'_, B>) -> Result<()> {
        ctx.panel.save_prices().await.map(drop)
    }
}
