// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::error;

use crate::{
    backend::Backend,
    error::{self, Result},
    prices::{BaseKey, DistrictField},
};

use super::Context;

/// Change one of the base prices. Values that are not numbers are stored as 0.
#[derive(Debug, Parser)]
pub(crate) struct SetBase {
    /// The diameter class to change.
    #[arg(value_enum)]
    pub(crate) key: BaseKey,

    /// The new price per tonne.
    #[arg(allow_hyphen_values = true)]
    pub(crate) value: String,
}

#[async_trait]
impl super::Command for SetBase {
    async fn execute<B: Backend>(self, ctx: &Context<'_, B>) -> Result<()> {
        let Some(stored) = ctx.panel.set_base_price(self.key, &self.value).await else {
            return no_document();
        };

        println!("{} = {}", self.key.label(), stored);
        Ok(())
    }
}

/// Rename a district. The name is everything after the row number, spaces
/// included.
#[derive(Debug, Parser)]
pub(crate) struct SetName {
    /// The row number shown by `show`.
    pub(crate) index: usize,

    /// The new name.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    words: Vec<String>,

    /// The name exactly as typed, when the whole line is known.
    #[arg(skip)]
    pub(crate) raw: Option<String>,
}

impl SetName {
    pub(crate) fn name(&self) -> String {
        self.raw.clone().unwrap_or_else(|| self.words.join(" "))
    }
}

#[async_trait]
impl super::Command for SetName {
    async fn execute<B: Backend>(self, ctx: &Context<'_, B>) -> Result<()> {
        let name = self.name();
        set_district_field(ctx, self.index, DistrictField::Name, &name).await
    }
}

/// Change the delivery cost of a district. Values that are not numbers are
/// stored as 0.
#[derive(Debug, Parser)]
pub(crate) struct SetCost {
    /// The row number shown by `show`.
    pub(crate) index: usize,

    /// The new delivery cost.
    #[arg(allow_hyphen_values = true)]
    pub(crate) value: String,
}

#[async_trait]
impl super::Command for SetCost {
    async fn execute<B: Backend>(self, ctx: &Context<'_, B>) -> Result<()> {
        set_district_field(ctx, self.index, DistrictField::Cost, &self.value).await
    }
}

/// Append a district with a placeholder name and no delivery cost.
#[derive(Debug, Parser)]
pub(crate) struct AddDistrict {}

#[async_trait]
impl super::Command for AddDistrict {
    async fn execute<B: Backend>(self, ctx: &Context<'_, B>) -> Result<()> {
        let Some(index) = ctx.panel.add_district().await else {
            return no_document();
        };

        println!("Added district {index}");
        Ok(())
    }
}

/// Remove a district. Rows below it move up by one.
#[derive(Debug, Parser)]
pub(crate) struct RemoveDistrict {
    /// The row number shown by `show`.
    pub(crate) index: usize,
}

#[async_trait]
impl super::Command for RemoveDistrict {
    async fn execute<B: Backend>(self, ctx: &Context<'_, B>) -> Result<()> {
        match ctx.panel.remove_district(self.index).await {
            Some(district) => {
                println!("Removed district {} ({})", self.index, district.name);
                Ok(())
            }
            None => no_district(self.index),
        }
    }
}

async fn set_district_field<B: Backend>(
    ctx: &Context<'_, B>,
    index: usize,
    field: DistrictField,
    raw: &str,
) -> Result<()> {
    if ctx.panel.set_district_field(index, field, raw).await {
        Ok(())
    } else {
        no_district(index)
    }
}

fn no_document() -> Result<()> {
    error!("No price list is loaded; try `fetch`");
    Err(error::Error::Command)
}

fn no_district(index: usize) -> Result<()> {
    error!("No district with index {}", index);
    Err(error::Error::Command)
}
