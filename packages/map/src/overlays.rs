//! Overlay sets for the field map and the report maps.

use survey_map_geometry::{Derivation, Overlay, units};
use survey_map_survey_models::{
    BoundaryStyle, DEFAULT_POINT_LABEL, LatLngBounds, ReportMetadata, SurveyPoint,
};

use crate::{LabelClass, MarkerStyle, OverlayShape, Stroke};

/// Line weight of field paths and polygons.
pub const FIELD_STROKE_WEIGHT: u32 = 6;

/// Fill opacity of field polygons.
pub const FIELD_FILL_OPACITY: f64 = 0.3;

/// Color of every report linework.
pub const PRINT_INK: &str = "#000000";

/// Color of the inset footprint rectangle.
pub const FOOTPRINT_COLOR: &str = "#ef4444";

/// `P{n}` tooltip for the point at 0-based `index`.
#[must_use]
pub fn point_tag(index: usize) -> String {
    format!("P{}", index + 1)
}

/// Report label for a point: `P{n}`, or `P{n} : {label}` unless the label is
/// the default marker label.
#[must_use]
pub fn print_label(index: usize, point: &SurveyPoint, metadata: &ReportMetadata) -> String {
    let label = metadata.effective_label(index, point);
    if label == DEFAULT_POINT_LABEL {
        point_tag(index)
    } else {
        format!("{} : {label}", point_tag(index))
    }
}

/// Markers, path or polygon, and measurement label for the field map.
#[must_use]
pub fn field_overlays(
    points: &[SurveyPoint],
    derivation: &Derivation,
    theme: &BoundaryStyle,
) -> Vec<OverlayShape> {
    let mut shapes: Vec<OverlayShape> = points
        .iter()
        .enumerate()
        .map(|(index, point)| OverlayShape::Marker {
            position: point.position(),
            icon: point.symbol_or_default().to_string(),
            color: point.color.clone().unwrap_or_else(|| theme.color.clone()),
            tooltip: Some(point_tag(index)),
            index,
            style: MarkerStyle::Field,
        })
        .collect();

    match &derivation.overlay {
        Overlay::None => {}
        Overlay::Path {
            vertices,
            label_anchor,
        } => {
            shapes.push(OverlayShape::Polyline {
                vertices: vertices.clone(),
                stroke: Stroke::solid(&theme.color, FIELD_STROKE_WEIGHT),
            });
            shapes.push(OverlayShape::Label {
                position: *label_anchor,
                text: units::format_meters(derivation.stats.distance_m),
                class: LabelClass::DistanceLabel,
            });
        }
        Overlay::Polygon { ring, label_anchor } => {
            shapes.push(OverlayShape::Polygon {
                ring: ring.clone(),
                stroke: Stroke::solid(&theme.color, FIELD_STROKE_WEIGHT)
                    .fill_opacity(FIELD_FILL_OPACITY),
            });
            shapes.push(OverlayShape::Label {
                position: *label_anchor,
                text: units::format_hectares(derivation.stats.area_m2),
                class: LabelClass::AreaLabel,
            });
        }
    }

    shapes
}

/// Print markers, point labels, and black linework for the main report map.
#[must_use]
pub fn print_overlays(
    points: &[SurveyPoint],
    derivation: &Derivation,
    theme: &BoundaryStyle,
    metadata: &ReportMetadata,
) -> Vec<OverlayShape> {
    let mut shapes = Vec::with_capacity(points.len() * 2 + 1);

    for (index, point) in points.iter().enumerate() {
        shapes.push(OverlayShape::Marker {
            position: point.position(),
            icon: point.symbol_or_default().to_string(),
            color: PRINT_INK.to_string(),
            tooltip: None,
            index,
            style: MarkerStyle::Print,
        });
        shapes.push(OverlayShape::Label {
            position: point.position(),
            text: print_label(index, point, metadata),
            class: LabelClass::PrintLabel,
        });
    }

    match &derivation.overlay {
        Overlay::None => {}
        Overlay::Path { vertices, .. } => shapes.push(OverlayShape::Polyline {
            vertices: vertices.clone(),
            stroke: Stroke::solid(PRINT_INK, 5).dashed("10, 10"),
        }),
        Overlay::Polygon { ring, .. } => shapes.push(OverlayShape::Polygon {
            ring: ring.clone(),
            stroke: Stroke::solid(PRINT_INK, 4).fill_color(&theme.color),
        }),
    }

    shapes
}

/// Red dashed rectangle marking the main map's footprint on the inset.
#[must_use]
pub fn footprint_rectangle(bounds: LatLngBounds) -> OverlayShape {
    OverlayShape::Rectangle {
        bounds,
        stroke: Stroke::solid(FOOTPRINT_COLOR, 2)
            .dashed("5, 5")
            .fill_opacity(0.15),
    }
}
