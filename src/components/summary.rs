use yew::prelude::*;

use super::use_currency;
use crate::budget::{Breakdown, Tone};

#[derive(Properties, PartialEq)]
pub struct SummaryPanelProps {
    pub breakdown: Breakdown,
}

#[function_component(SummaryPanel)]
pub fn summary_panel(props: &SummaryPanelProps) -> Html {
    let currency = use_currency();
    let texts = props.breakdown.texts(currency);
    let badge_class = match texts.tone {
        Tone::Ok => "badge ok",
        Tone::Warn => "badge warn",
        Tone::Bad => "badge bad",
    };

    html! {
        <div class="summary">
            <div class="stat">
                <p class="stat-label">{"Výdaje celkem"}</p>
                <p id="sumVydeje" class="stat-value">{ texts.total_expenses }</p>
            </div>
            <div class="stat">
                <p class="stat-label">{"Zůstatek"}</p>
                <p id="zustatek" class="stat-value">{ texts.remaining }</p>
            </div>
            <div class="stat">
                <p class="stat-label">{"Poměr úspor"}</p>
                <p id="pomerUspor" class="stat-value">{ texts.savings_ratio }</p>
            </div>
            <div id="stavBadge" class="stat">
                <span class={badge_class}>{ texts.status }</span>
            </div>
        </div>
    }
}
