//! Stacked bar chart, one bar per organization.

use super::{Canvas, FONT_FAMILY, escape_xml, num};
use crate::rank::RankedOrganization;
use crate::tally::PrState;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 80.0;
const MARGIN_BOTTOM: f64 = 100.0;
const MAX_BAR_WIDTH: f64 = 60.0;
const TARGET_TICKS: u64 = 5;

/// Axis top and tick step for a largest value of `max`.
///
/// The step is the smallest 1, 2 or 5 times a power of ten giving at most
/// `TARGET_TICKS` intervals; the top is the first multiple of the step
/// covering `max`, and never zero.
pub fn nice_axis(max: u64) -> (u64, u64) {
    let mut magnitude = 1u64;
    let step = loop {
        if let Some(step) = [1u64, 2, 5]
            .iter()
            .map(|m| m.saturating_mul(magnitude))
            .find(|s| max.div_ceil(*s) <= TARGET_TICKS)
        {
            break step;
        }
        magnitude = magnitude.saturating_mul(10);
    };
    let top = max.div_ceil(step).max(1).saturating_mul(step);
    (top, step)
}

fn stacked_total(org: &RankedOrganization, show_closed: bool) -> u64 {
    segments(org, show_closed)
        .iter()
        .map(|&(_, n)| u64::from(n))
        .sum()
}

/// Segments bottom to top. Closed only when requested.
fn segments(org: &RankedOrganization, show_closed: bool) -> Vec<(PrState, u32)> {
    let mut out = vec![
        (PrState::Merged, org.counts.merged),
        (PrState::Open, org.counts.open),
    ];
    if show_closed {
        out.push((PrState::Closed, org.counts.closed));
    }
    out
}

fn label(state: PrState) -> &'static str {
    match state {
        PrState::Merged => "Merged",
        PrState::Open => "Open",
        PrState::Closed => "Closed",
    }
}

pub fn render(canvas: &Canvas<'_>, orgs: &[RankedOrganization]) -> String {
    let colors = canvas.theme.colors();
    let fill = |state: PrState| match state {
        PrState::Merged => colors.merged,
        PrState::Open => colors.open,
        PrState::Closed => colors.closed,
    };

    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;

    let stacked_max = orgs
        .iter()
        .map(|o| stacked_total(o, canvas.show_closed))
        .max()
        .unwrap_or(0);
    let (axis_top, step) = nice_axis(stacked_max);
    let scale = plot_h / axis_top as f64;

    let mut out = Vec::new();

    // Grid and y ticks
    for tick in (0..=axis_top).step_by(step as usize) {
        let y = baseline - tick as f64 * scale;
        out.push(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1"/>"#,
            num(MARGIN_LEFT),
            num(y),
            num(MARGIN_LEFT + plot_w),
            num(y),
            colors.line
        ));
        out.push(format!(
            r#"<text x="{}" y="{}" text-anchor="end" class="text tick">{tick}</text>"#,
            num(MARGIN_LEFT - 8.0),
            num(y + 4.0)
        ));
    }

    // Axes
    out.push(format!(
        r#"<line class="axis" x1="{x}" y1="{top}" x2="{x}" y2="{bottom}" stroke="{c}" stroke-width="2"/>"#,
        x = num(MARGIN_LEFT),
        top = num(MARGIN_TOP),
        bottom = num(baseline),
        c = colors.text
    ));
    out.push(format!(
        r#"<line class="axis" x1="{left}" y1="{y}" x2="{right}" y2="{y}" stroke="{c}" stroke-width="2"/>"#,
        left = num(MARGIN_LEFT),
        right = num(MARGIN_LEFT + plot_w),
        y = num(baseline),
        c = colors.text
    ));
    out.push(format!(
        r#"<text x="{x}" y="{y}" text-anchor="middle" class="text" transform="rotate(-90 {x} {y})">Pull requests</text>"#,
        x = num(MARGIN_LEFT - 45.0),
        y = num(MARGIN_TOP + plot_h / 2.0)
    ));
    out.push(format!(
        r#"<text x="{}" y="{}" text-anchor="middle" class="text">Organization</text>"#,
        num(MARGIN_LEFT + plot_w / 2.0),
        num(HEIGHT - 12.0)
    ));

    // Bars
    if !orgs.is_empty() {
        let slot = plot_w / orgs.len() as f64;
        let bar_w = (slot * 0.6).min(MAX_BAR_WIDTH);
        for (i, org) in orgs.iter().enumerate() {
            let center = MARGIN_LEFT + slot * (i as f64 + 0.5);
            let x = center - bar_w / 2.0;
            let mut y = baseline;
            for (state, count) in segments(org, canvas.show_closed) {
                if count == 0 {
                    continue;
                }
                let h = count as f64 * scale;
                y -= h;
                out.push(format!(
                    r#"<rect class="bar" x="{}" y="{}" width="{}" height="{}" fill="{}"><title>{}: {} {count}</title></rect>"#,
                    num(x),
                    num(y),
                    num(bar_w),
                    num(h),
                    fill(state),
                    escape_xml(&org.name),
                    label(state).to_lowercase()
                ));
            }
            out.push(format!(
                r#"<text x="{}" y="{}" text-anchor="middle" class="text tick">{}</text>"#,
                num(center),
                num(y - 6.0),
                stacked_total(org, canvas.show_closed)
            ));
            let label_y = baseline + 16.0;
            out.push(format!(
                r#"<text x="{x}" y="{y}" text-anchor="end" class="text tick" transform="rotate(-35 {x} {y})">{name}</text>"#,
                x = num(center),
                y = num(label_y),
                name = escape_xml(&org.name)
            ));
        }
    }

    // Legend
    let mut legend_x = MARGIN_LEFT + plot_w;
    let states: &[PrState] = if canvas.show_closed {
        &[PrState::Closed, PrState::Open, PrState::Merged]
    } else {
        &[PrState::Open, PrState::Merged]
    };
    for &state in states {
        legend_x -= 80.0;
        out.push(format!(
            r#"<rect class="legend" x="{}" y="{}" width="12" height="12" rx="2" fill="{}"/>"#,
            num(legend_x),
            num(MARGIN_TOP - 30.0),
            fill(state)
        ));
        out.push(format!(
            r#"<text x="{}" y="{}" class="text tick">{}</text>"#,
            num(legend_x + 18.0),
            num(MARGIN_TOP - 20.0),
            label(state)
        ));
    }

    format!(
        r#"<?xml version='1.0' encoding='UTF-8'?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<style>.text {{ font-family: {font}; fill: {text}; font-size: 12px; }} .tick {{ font-size: 11px; }} .title {{ font-size: 18px; font-weight: 600; }}</style>
<rect width="{w}" height="{h}" fill="{bg}"/>
<text x="{title_x}" y="32" class="text title">Pull requests by organization</text>
<text x="{title_x}" y="52" class="text tick">@{login} · as of {date}</text>
{body}
</svg>
"#,
        w = num(WIDTH),
        h = num(HEIGHT),
        font = FONT_FAMILY,
        text = colors.text,
        bg = colors.bg,
        title_x = num(MARGIN_LEFT),
        login = escape_xml(canvas.user),
        date = canvas.generated_on.format("%Y-%m-%d"),
        body = out.join("\n"),
    )
}
