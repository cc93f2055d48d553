// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDateTime, TimeZone};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

/// Name given to a district appended by [`PriceDocument::add_district`].
pub(crate) const NEW_DISTRICT_NAME: &str = "Yeni İlçe";

/// Parses an amount typed by the operator.
///
/// Leading whitespace and an optional sign are accepted, followed by the
/// longest run of ASCII digits; anything after the digits is ignored. Input
/// without digits, and negative amounts, become `0`. Amounts too large to
/// represent saturate.
pub(crate) fn parse_amount(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = unsigned.get(..end).unwrap_or_default();
    if digits.is_empty() || negative {
        return 0;
    }

    digits.parse().unwrap_or(u64::MAX)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum BaseKey {
    P8,
    P10,
    P12,
}

impl BaseKey {
    pub(crate) const ALL: [Self; 3] = [Self::P8, Self::P10, Self::P12];

    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::P8 => "Ø 8 mm",
            Self::P10 => "Ø 10 mm",
            Self::P12 => "Ø 12-32 mm",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BasePrices {
    pub(crate) p8: u64,
    pub(crate) p10: u64,
    pub(crate) p12: u64,
}

impl BasePrices {
    pub(crate) const fn get(&self, key: BaseKey) -> u64 {
        match key {
            BaseKey::P8 => self.p8,
            BaseKey::P10 => self.p10,
            BaseKey::P12 => self.p12,
        }
    }

    fn get_mut(&mut self, key: BaseKey) -> &mut u64 {
        match key {
            BaseKey::P8 => &mut self.p8,
            BaseKey::P10 => &mut self.p10,
            BaseKey::P12 => &mut self.p12,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub(crate) struct District {
    #[tabled(rename = "İlçe Adı")]
    pub(crate) name: String,
    #[tabled(rename = "Nakliye Ücreti (₺)")]
    pub(crate) cost: u64,
}

impl Default for District {
    fn default() -> Self {
        Self {
            name: NEW_DISTRICT_NAME.to_owned(),
            cost: 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DistrictField {
    Name,
    Cost,
}

/// When the backend last saved the price list, in whatever shape it sent.
/// The value is sent back untouched; it is only interpreted for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum LastUpdated {
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    Text(String),
    Other(Value),
}

impl LastUpdated {
    /// Interprets the value as an instant in `tz`. Text without an offset is
    /// taken to be local to `tz`.
    pub(crate) fn in_timezone<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        match *self {
            Self::Millis(ms) => tz.timestamp_millis_opt(ms).single(),
            Self::Text(ref text) => {
                let text = text.trim();
                DateTime::parse_from_rfc3339(text)
                    .map(|t| t.with_timezone(tz))
                    .ok()
                    .or_else(|| {
                        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                            .ok()
                            .and_then(|naive| tz.from_local_datetime(&naive).single())
                    })
            }
            Self::Other(_) => None,
        }
    }
}

/// The price list as the backend stores it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PriceDocument {
    pub(crate) base_prices: BasePrices,
    #[serde(default)]
    pub(crate) districts: Vec<District>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_updated: Option<LastUpdated>,
    /// Fields this client does not edit. Kept so a save does not strip them.
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl PriceDocument {
    /// Replaces one base price and returns the value stored.
    pub(crate) fn set_base_price(&mut self, key: BaseKey, raw: &str) -> u64 {
        let value = parse_amount(raw);
        *self.base_prices.get_mut(key) = value;
        value
    }

    /// Returns `false` when there is no district at `index`.
    pub(crate) fn set_district_field(
        &mut self,
        index: usize,
        field: DistrictField,
        raw: &str,
    ) -> bool {
        let Some(district) = self.districts.get_mut(index) else {
            return false;
        };

        match field {
            DistrictField::Name => raw.clone_into(&mut district.name),
            DistrictField::Cost => district.cost = parse_amount(raw),
        }
        true
    }

    /// Appends a placeholder district and returns its index.
    pub(crate) fn add_district(&mut self) -> usize {
        self.districts.push(District::default());
        self.districts.len() - 1
    }

    pub(crate) fn remove_district(&mut self, index: usize) -> Option<District> {
        (index < self.districts.len()).then(|| self.districts.remove(index))
    }
}
