use yew::prelude::*;

use super::use_currency;
use crate::budget::Breakdown;
use crate::chart::{donut_slices, legend_entries};
use crate::settings::{CHART_CENTER, CHART_RADIUS};

#[derive(Properties, PartialEq)]
pub struct DonutChartProps {
    pub breakdown: Breakdown,
}

#[function_component(DonutChart)]
pub fn donut_chart(props: &DonutChartProps) -> Html {
    let currency = use_currency();
    let texts = props.breakdown.texts(currency);
    let slices = donut_slices(&props.breakdown);
    let size = (CHART_CENTER * 2.0).to_string();
    let center = CHART_CENTER.to_string();

    html! {
        <div class="donut">
            <svg viewBox={format!("0 0 {} {}", size, size)} width={size.clone()} height={size.clone()}>
                <circle class="track" cx={center.clone()} cy={center.clone()} r={CHART_RADIUS.to_string()} fill="none" />
                <g id="slices">
                    { for slices.iter().map(|slice| html! {
                        <path
                            key={slice.key.clone()}
                            class="slice"
                            d={slice.path.clone()}
                            fill="none"
                            style={format!("stroke:{};opacity:{}", slice.color, slice.opacity)}
                        />
                    }) }
                </g>
            </svg>
            <div class="donut-center">
                <span id="centerBig" class="center-big">{ texts.headline }</span>
                <span id="centerSmall" class="center-small">{ texts.caption }</span>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LegendProps {
    pub breakdown: Breakdown,
}

#[function_component(Legend)]
pub fn legend(props: &LegendProps) -> Html {
    let entries = legend_entries(&props.breakdown);
    html! {
        <div id="legend" class="legend">
            { for entries.iter().map(|entry| html! {
                <span key={entry.key.clone()} class="pill">
                    <span class="dot" style={format!("background:{}", entry.color)}></span>
                    { format!(" {}", entry.label) }
                </span>
            }) }
        </div>
    }
}
