//! Hub-and-spoke diagram: the user in the middle, organizations on a ring.

use super::{Canvas, FONT_FAMILY, ThemeColors, escape_xml, num};
use crate::avatar::Avatars;
use crate::rank::RankedOrganization;
use std::f64::consts::PI;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const ORBIT_RADIUS: f64 = 180.0;
const USER_RADIUS: f64 = 40.0;
const ORG_RADIUS: f64 = 25.0;
/// Clearance between a node and the ends of its connector.
const GAP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    /// At least one merged pull request.
    Merged,
    OpenOnly,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub kind: ConnectorKind,
}

impl Connector {
    pub fn dashed(&self) -> bool {
        self.kind == ConnectorKind::OpenOnly
    }

    fn color<'c>(&self, colors: &'c ThemeColors) -> &'c str {
        match self.kind {
            ConnectorKind::Merged => colors.merged,
            ConnectorKind::OpenOnly => colors.open,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrgNode {
    pub angle: f64,
    pub point: LayoutPoint,
    pub connector: Connector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub user: LayoutPoint,
    pub orgs: Vec<OrgNode>,
}

/// Angle of node `i` of `n`: the first sits at the top, the rest follow clockwise.
pub fn node_angle(i: usize, n: usize) -> f64 {
    2.0 * PI * i as f64 / n as f64 - PI / 2.0
}

pub fn layout(orgs: &[RankedOrganization]) -> Layout {
    let (cx, cy) = (WIDTH / 2.0, HEIGHT / 2.0);
    let along = |angle: f64, dist: f64| (cx + dist * angle.cos(), cy + dist * angle.sin());

    let n = orgs.len();
    let nodes = orgs
        .iter()
        .enumerate()
        .map(|(i, org)| {
            let angle = node_angle(i, n);
            let (x, y) = along(angle, ORBIT_RADIUS);
            let kind = if org.counts.merged > 0 {
                ConnectorKind::Merged
            } else {
                ConnectorKind::OpenOnly
            };
            OrgNode {
                angle,
                point: LayoutPoint {
                    x,
                    y,
                    r: ORG_RADIUS,
                },
                connector: Connector {
                    start: along(angle, USER_RADIUS + GAP + 5.0),
                    end: along(angle, ORBIT_RADIUS - ORG_RADIUS - GAP),
                    kind,
                },
            }
        })
        .collect();

    Layout {
        user: LayoutPoint {
            x: cx,
            y: cy,
            r: USER_RADIUS,
        },
        orgs: nodes,
    }
}

fn clip_path(id: &str, p: &LayoutPoint) -> String {
    format!(
        r#"<clipPath id="{id}"><circle cx="{}" cy="{}" r="{}"/></clipPath>"#,
        num(p.x),
        num(p.y),
        num(p.r)
    )
}

fn image(href: Option<&String>, clip_id: &str, p: &LayoutPoint) -> Option<String> {
    href.map(|href| {
        format!(
            r#"<image href="{}" x="{}" y="{}" width="{}" height="{}" clip-path="url(#{clip_id})"/>"#,
            escape_xml(href),
            num(p.x - p.r),
            num(p.y - p.r),
            num(p.r * 2.0),
            num(p.r * 2.0)
        )
    })
}

/// Second caption line: a colored dot per non-zero merged/open count.
fn count_caption(org: &RankedOrganization, colors: &ThemeColors) -> String {
    let mut terms = Vec::new();
    if org.counts.merged > 0 {
        terms.push(format!(
            r#"<tspan fill="{}">● {}</tspan>"#,
            colors.merged, org.counts.merged
        ));
    }
    if org.counts.open > 0 {
        terms.push(format!(
            r#"<tspan fill="{}">● {}</tspan>"#,
            colors.open, org.counts.open
        ));
    }
    terms.join(" ")
}

pub fn render(canvas: &Canvas<'_>, orgs: &[RankedOrganization], avatars: &Avatars) -> String {
    let colors = canvas.theme.colors();
    let layout = layout(orgs);

    let mut defs = Vec::new();
    let mut connectors = Vec::new();
    let mut nodes = Vec::new();

    for (id, color) in [("arrow-merged", colors.merged), ("arrow-open", colors.open)] {
        defs.push(format!(
            r#"<marker id="{id}" markerWidth="10" markerHeight="10" refX="9" refY="3" orient="auto" markerUnits="strokeWidth"><path d="M0,0 L0,6 L9,3 z" fill="{color}"/></marker>"#
        ));
    }

    let user = &layout.user;
    defs.push(clip_path("user-clip", user));
    nodes.push(format!(
        r#"<circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="2"/>"#,
        num(user.x),
        num(user.y),
        num(user.r + 4.0),
        colors.ring,
        colors.line
    ));
    nodes.extend(image(avatars.get(canvas.user), "user-clip", user));

    for (i, (org, node)) in orgs.iter().zip(&layout.orgs).enumerate() {
        let c = &node.connector;
        let color = c.color(&colors);
        let (dash, marker) = if c.dashed() {
            (r#" stroke-dasharray="5,5""#, "arrow-open")
        } else {
            ("", "arrow-merged")
        };
        connectors.push(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{color}" stroke-width="2"{dash} marker-end="url(#{marker})"/>"#,
            num(c.start.0),
            num(c.start.1),
            num(c.end.0),
            num(c.end.1)
        ));

        let p = &node.point;
        let clip_id = format!("clip-{i}");
        defs.push(clip_path(&clip_id, p));
        nodes.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{color}" stroke-width="2"/>"#,
            num(p.x),
            num(p.y),
            num(p.r + 3.0),
            colors.node_bg
        ));
        nodes.extend(image(avatars.get(&org.name), &clip_id, p));

        let text_y = p.y + p.r + 20.0;
        nodes.push(format!(
            r#"<text x="{}" y="{}" text-anchor="middle" class="text" font-size="12">{}</text>"#,
            num(p.x),
            num(text_y),
            escape_xml(&org.name)
        ));
        nodes.push(format!(
            r#"<text x="{}" y="{}" text-anchor="middle" class="text sub">{}</text>"#,
            num(p.x),
            num(text_y + 15.0),
            count_caption(org, &colors)
        ));
    }

    format!(
        r#"<?xml version='1.0' encoding='UTF-8'?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<title>Pull requests by {login}, {date}</title>
<style>.text {{ font-family: {font}; fill: {text}; font-weight: 600; }} .sub {{ font-size: 10px; font-weight: 400; }}</style>
<rect width="{w}" height="{h}" fill="{bg}"/>
<defs>
{defs}
</defs>
{connectors}
{nodes}
</svg>
"#,
        w = num(WIDTH),
        h = num(HEIGHT),
        login = escape_xml(canvas.user),
        date = canvas.generated_on.format("%Y-%m-%d"),
        font = FONT_FAMILY,
        text = colors.text,
        bg = colors.bg,
        defs = defs.join("\n"),
        connectors = connectors.join("\n"),
        nodes = nodes.join("\n"),
    )
}
