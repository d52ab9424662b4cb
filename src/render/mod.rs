pub mod bar;
pub mod radial;

use crate::avatar::Avatars;
use crate::rank::RankedOrganization;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Style {
    /// Stacked bar per organization
    Bar,
    /// User at the center, organizations around it
    Radial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Theme {
    Dark,
    Light,
}

pub struct ThemeColors {
    pub bg: &'static str,
    pub text: &'static str,
    pub line: &'static str,
    pub node_bg: &'static str,
    pub ring: &'static str,
    pub merged: &'static str,
    pub open: &'static str,
    pub closed: &'static str,
}

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                bg: "transparent",
                text: "#c9d1d9",
                line: "#30363d",
                node_bg: "#0d1117",
                ring: "#21262d",
                merged: "#a371f7",
                open: "#3fb950",
                closed: "#f85149",
            },
            Theme::Light => ThemeColors {
                bg: "transparent",
                text: "#24292f",
                line: "#d0d7de",
                node_bg: "#ffffff",
                ring: "#f6f8fa",
                merged: "#8250df",
                open: "#1a7f37",
                closed: "#cf222e",
            },
        }
    }
}

/// What a render needs besides the ranked organizations.
pub struct Canvas<'a> {
    pub user: &'a str,
    pub theme: Theme,
    pub show_closed: bool,
    pub generated_on: NaiveDate,
}

/// Draw `orgs` in the requested style. Avatars are only used by the radial style.
pub fn render(
    style: Style,
    canvas: &Canvas<'_>,
    orgs: &[RankedOrganization],
    avatars: &Avatars,
) -> String {
    match style {
        Style::Bar => bar::render(canvas, orgs),
        Style::Radial => radial::render(canvas, orgs, avatars),
    }
}

pub(crate) const FONT_FAMILY: &str =
    r#"-apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif"#;

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Coordinates rounded to two decimals, without trailing zeros.
pub(crate) fn num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
