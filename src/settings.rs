use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage::KeyValueStore;

pub const STORAGE_KEY: &str = "rozpocetData_v7";
pub const SETTINGS_KEY: &str = "rozpocetSettings_v1";

pub const PALETTE: [&str; 8] = [
    "#8b5cf6", "#22c55e", "#06b6d4", "#ef4444", "#3b82f6", "#f97316", "#eab308", "#14b8a6",
];
pub const REMAINING_COLOR: &str = "#f59e0b";

// Donut geometry, in SVG user units and degrees.
pub const CHART_CENTER: f64 = 130.0;
pub const CHART_RADIUS: f64 = 95.0;
pub const ZERO_SLICE_DEG: f64 = 2.0;
pub const ZERO_SLICE_OPACITY: f64 = 0.25;
pub const MAX_SPAN_DEG: f64 = 359.99;
pub const LEFTOVER_CAP_PERCENT: f64 = 99.999;

pub const UNDER_CONTROL_RATIO: f64 = 0.5;
pub const ELEVATED_RATIO: f64 = 0.8;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Palette color for the category at `index`, wrapping around.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "CZK")]
    Czk,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Czk, Currency::Eur, Currency::Usd];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Czk => "CZK",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Czk => "Kč",
            Currency::Eur => "€",
            Currency::Usd => "US$",
        }
    }

    pub fn from_code(code: &str) -> Option<Currency> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code.trim()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub currency: Currency,
}

pub fn load_settings(store: &impl KeyValueStore) -> Settings {
    match store.get(SETTINGS_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::debug!(error = %err, "ignoring malformed settings record");
                Settings::default()
            }
        },
        Ok(None) => Settings::default(),
        Err(err) => {
            tracing::warn!(error = %err, "could not read settings");
            Settings::default()
        }
    }
}

pub fn save_settings(store: &impl KeyValueStore, settings: &Settings) {
    let result = serde_json::to_string(settings)
        .map_err(StorageError::from)
        .and_then(|raw| store.set(SETTINGS_KEY, &raw));
    if let Err(err) = result {
        tracing::warn!(error = %err, "could not persist settings");
    }
}

/// Switch to `currency` and persist it. `None` when it is already selected.
pub fn change_currency(
    store: &impl KeyValueStore,
    current: &Settings,
    currency: Currency,
) -> Option<Settings> {
    if current.currency == currency {
        return None;
    }
    let next = Settings { currency };
    save_settings(store, &next);
    tracing::info!(currency = currency.code(), "currency changed");
    Some(next)
}
