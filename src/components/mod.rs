mod app;
mod category_block;
mod donut;
mod settings_bar;
mod summary;

pub use app::App;
pub use category_block::{CategoryBlock, ItemRow};
pub use donut::{DonutChart, Legend};
pub use settings_bar::SettingsBar;
pub use summary::SummaryPanel;

use yew::prelude::*;

use crate::settings::{Currency, Settings};

/// Currency from the settings context, or the default outside a provider.
#[hook]
fn use_currency() -> Currency {
    use_context::<UseStateHandle<Settings>>()
        .map(|settings| settings.currency)
        .unwrap_or_default()
}
