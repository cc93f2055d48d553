// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use clap::Parser;
use tabled::{
    settings::{object::Cell, Format, Modify, Style},
    Table, Tabled,
};

use crate::{
    backend::Backend,
    error::Result,
    prices::{BaseKey, LastUpdated, PriceDocument},
};

use super::Context;

#[derive(Tabled)]
struct BasePrice {
    #[tabled(rename = "Anahtar")]
    key: &'static str,
    #[tabled(rename = "Çap")]
    label: &'static str,
    #[tabled(rename = "Fiyat (₺/ton)")]
    price: u64,
}

fn key_name(key: BaseKey) -> &'static str {
    match key {
        BaseKey::P8 => "p8",
        BaseKey::P10 => "p10",
        BaseKey::P12 => "p12",
    }
}

fn format_timestamp<Tz: TimeZone>(timestamp: Option<&LastUpdated>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let Some(timestamp) = timestamp else {
        return "Bilinmiyor".to_owned();
    };

    match timestamp.in_timezone(tz) {
        Some(t) => t.format("%d.%m.%Y %H:%M:%S").to_string(),
        None => match *timestamp {
            LastUpdated::Text(ref text) if !text.trim().is_empty() => text.clone(),
            LastUpdated::Other(ref value) if !value.is_null() => value.to_string(),
            LastUpdated::Millis(_) | LastUpdated::Text(_) | LastUpdated::Other(_) => {
                "Bilinmiyor".to_owned()
            }
        },
    }
}

fn render(document: PriceDocument) -> String {
    let mut out = format!(
        "Son güncelleme: {}\n\n",
        format_timestamp(document.last_updated.as_ref(), &Local)
    );

    out.push_str(
        &Table::new(BaseKey::ALL.into_iter().map(|key| BasePrice {
            key: key_name(key),
            label: key.label(),
            price: document.base_prices.get(key),
        }))
        .with(Style::rounded())
        .to_string(),
    );
    out.push_str("\n\n");

    if document.districts.is_empty() {
        out.push_str("İlçe tanımlı değil");
    } else {
        out.push_str(
            &Table::new((0_u32..).zip(document.districts))
                .with(Style::rounded())
                .with(Modify::new(Cell::new(0, 0)).with(Format::content(|_| "#".to_owned())))
                .to_string(),
        );
    }
    out
}

/// Print the loaded price list.
#[derive(Debug, Parser)]
pub(crate) struct Show {}

#[async_trait]
impl super::Command for Show {
    async fn execute<B: Backend>(self, ctx: &Context<'_, B>) -> Result<()> {
        if let Some(username) = ctx.panel.session().await.username() {
            println!("Kullanıcı: {username}");
        }

        match ctx.panel.document().await {
            Some(document) => println!("{}", render(document)),
            None => println!("Fiyat listesi yüklenmedi"),
        }
        Ok(())
    }
}
