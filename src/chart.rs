use crate::budget::Breakdown;
use crate::geometry::describe_arc;
use crate::settings::{
    CHART_CENTER, CHART_RADIUS, LEFTOVER_CAP_PERCENT, MAX_SPAN_DEG, REMAINING_COLOR,
    ZERO_SLICE_DEG, ZERO_SLICE_OPACITY,
};

pub const REMAINING_KEY: &str = "remaining";
pub const REMAINING_LABEL: &str = "Zůstatek";

#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    pub key: String,
    pub path: String,
    pub color: String,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub key: String,
    pub label: String,
    pub color: String,
}

pub fn donut_slices(breakdown: &Breakdown) -> Vec<Slice> {
    let mut slices = Vec::with_capacity(breakdown.shares.len() + 1);
    let mut start = 0.0;

    for share in &breakdown.shares {
        let real_span = share.percent / 100.0 * 360.0;
        // Empty categories get a faint sliver but do not advance the ring.
        let (drawn_span, opacity) = if share.percent > 0.0 {
            (real_span.min(MAX_SPAN_DEG), 1.0)
        } else {
            (ZERO_SLICE_DEG, ZERO_SLICE_OPACITY)
        };
        slices.push(Slice {
            key: share.id.clone(),
            path: describe_arc(CHART_CENTER, CHART_CENTER, CHART_RADIUS, start, start + drawn_span),
            color: share.color.clone(),
            opacity,
        });
        start += real_span;
    }

    if breakdown.leftover_percent > 0.0 {
        let span = breakdown.leftover_percent.min(LEFTOVER_CAP_PERCENT) / 100.0 * 360.0;
        slices.push(Slice {
            key: REMAINING_KEY.to_string(),
            path: describe_arc(CHART_CENTER, CHART_CENTER, CHART_RADIUS, start, start + span),
            color: REMAINING_COLOR.to_string(),
            opacity: 1.0,
        });
    }

    slices
}

pub fn legend_entries(breakdown: &Breakdown) -> Vec<LegendEntry> {
    let mut entries: Vec<LegendEntry> = breakdown
        .shares
        .iter()
        .map(|share| LegendEntry {
            key: share.id.clone(),
            label: share.name.clone(),
            color: share.color.clone(),
        })
        .collect();
    if breakdown.leftover_percent > 0.0 {
        entries.push(LegendEntry {
            key: REMAINING_KEY.to_string(),
            label: REMAINING_LABEL.to_string(),
            color: REMAINING_COLOR.to_string(),
        });
    }
    entries
}
