//! SVG rendition of one report map panel.
//!
//! Overlays are projected into panel pixels and clipped to the panel (plus
//! [`CLIP_MARGIN`]) before they are written; a `clipPath` then hides the
//! margin, so strokes that run off the panel never show on the page.

use std::fmt::Write as _;

use survey_map_map::{LabelClass, MarkerStyle, OverlayShape, Stroke};
use survey_map_survey_models::{LatLng, LatLngBounds};

use crate::clip::{PixelRect, Px, clip_polyline, clip_ring};
use crate::layout::PanelProjection;
use crate::markup::escape_markup;

/// Main map panel size, in frame pixels.
pub const MAIN_PANEL: (f64, f64) = (760.0, 532.0);

/// Inset panel size, in frame pixels.
pub const INSET_PANEL: (f64, f64) = (240.0, 180.0);

/// Extra pixels kept around the panel when clipping, wider than any stroke.
pub const CLIP_MARGIN: f64 = 16.0;

/// Background color of an untiled map panel.
pub const PANEL_BACKGROUND: &str = "#f1f5f9";

const MARKER_SIZE: f64 = 20.0;

fn line_attrs(stroke: &Stroke) -> String {
    let mut attrs = format!(
        r#"fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round""#,
        escape_markup(&stroke.color),
        stroke.weight
    );
    if let Some(dash) = &stroke.dash {
        let _ = write!(attrs, r#" stroke-dasharray="{}""#, escape_markup(dash));
    }
    attrs
}

fn fill_attrs(stroke: &Stroke) -> String {
    format!(
        r#"stroke="none" fill="{}" fill-opacity="{}" fill-rule="evenodd""#,
        escape_markup(stroke.fill()),
        stroke.fill_opacity
    )
}

fn points_attr(points: &[Px]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn project_all(projection: &PanelProjection, vertices: &[LatLng]) -> Vec<Px> {
    vertices.iter().map(|v| projection.project(*v)).collect()
}

/// Writes a closed outline as clipped polylines plus a clipped fill.
fn write_area(out: &mut String, ring: &[Px], stroke: &Stroke, clip: PixelRect) {
    let fill = clip_ring(ring, clip);
    if !fill.is_empty() {
        let _ = write!(
            out,
            r#"<polygon points="{}" {}/>"#,
            points_attr(&fill),
            fill_attrs(stroke)
        );
    }

    let mut outline = ring.to_vec();
    if let Some(&first) = ring.first() {
        if ring.last() != Some(&first) {
            outline.push(first);
        }
    }
    for run in clip_polyline(&outline, clip) {
        let _ = write!(
            out,
            r#"<polyline points="{}" {}/>"#,
            points_attr(&run),
            line_attrs(stroke)
        );
    }
}

/// Writes the panel content for `overlays` framed on `bounds`, in panel
/// coordinates, under the clip path `{id}-clip`.
fn write_panel_body(
    out: &mut String,
    id: &str,
    overlays: &[OverlayShape],
    bounds: LatLngBounds,
    (width, height): (f64, f64),
) {
    let projection = PanelProjection::new(bounds, width, height);
    let clip = PixelRect::new(width, height).expanded(CLIP_MARGIN);
    let id = escape_markup(id);

    let _ = write!(
        out,
        r#"<defs><clipPath id="{id}-clip"><rect width="{width}" height="{height}"/></clipPath></defs><rect width="{width}" height="{height}" fill="{PANEL_BACKGROUND}"/><g clip-path="url(#{id}-clip)">"#
    );

    for shape in overlays {
        match shape {
            OverlayShape::Polyline { vertices, stroke } => {
                for run in clip_polyline(&project_all(&projection, vertices), clip) {
                    let _ = write!(
                        out,
                        r#"<polyline points="{}" {}/>"#,
                        points_attr(&run),
                        line_attrs(stroke)
                    );
                }
            }
            OverlayShape::Polygon { ring, stroke } => {
                write_area(out, &project_all(&projection, ring), stroke, clip);
            }
            OverlayShape::Rectangle { bounds, stroke } => {
                let (x0, y0) = projection.project(bounds.south_west());
                let (x1, y1) = projection.project(bounds.north_east());
                let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
                write_area(out, &corners, stroke, clip);
            }
            OverlayShape::Marker {
                position,
                color,
                style,
                index,
                ..
            } => {
                let (x, y) = projection.project(*position);
                if !clip.contains((x, y)) {
                    continue;
                }
                let (fill, border) = match style {
                    MarkerStyle::Field => (color.as_str(), "#ffffff"),
                    MarkerStyle::Print => ("#ffffff", "#000000"),
                };
                let _ = write!(
                    out,
                    r#"<rect class="marker" data-index="{index}" x="{:.1}" y="{:.1}" width="{MARKER_SIZE}" height="{MARKER_SIZE}" fill="{}" stroke="{border}" stroke-width="2"/>"#,
                    x - MARKER_SIZE / 2.0,
                    y - MARKER_SIZE / 2.0,
                    escape_markup(fill)
                );
            }
            OverlayShape::Label {
                position,
                text,
                class,
            } => {
                let (x, y) = projection.project(*position);
                if !clip.contains((x, y)) {
                    continue;
                }
                let (dx, dy, anchor) = match class {
                    LabelClass::PrintLabel => (15.0, -15.0, "start"),
                    LabelClass::DistanceLabel | LabelClass::AreaLabel => (0.0, 0.0, "middle"),
                };
                let _ = write!(
                    out,
                    r##"<text class="{class}" x="{:.1}" y="{:.1}" text-anchor="{anchor}" font-size="11" font-weight="900" fill="#000000" stroke="#ffffff" stroke-width="3" paint-order="stroke">{}</text>"##,
                    x + dx,
                    y + dy,
                    escape_markup(text)
                );
            }
        }
    }

    out.push_str("</g>");
}

/// Renders `overlays` as a standalone SVG panel showing `bounds`.
#[must_use]
pub fn render_panel_svg(
    id: &str,
    overlays: &[OverlayShape],
    bounds: LatLngBounds,
    (width, height): (f64, f64),
) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    write_panel_body(&mut svg, id, overlays, bounds, (width, height));
    svg.push_str("</svg>");
    svg
}

/// Writes the panel as a group translated to `origin` inside a larger SVG.
pub fn write_panel_group(
    out: &mut String,
    id: &str,
    overlays: &[OverlayShape],
    bounds: LatLngBounds,
    size: (f64, f64),
    (x, y): (f64, f64),
) {
    let _ = write!(out, r#"<g transform="translate({x} {y})">"#);
    write_panel_body(out, id, overlays, bounds, size);
    out.push_str("</g>");
}
