//! KML 2.2 document for a survey.

use std::fmt::Write as _;

use survey_map_geometry::{MIN_PATH_POINTS, MIN_POLYGON_POINTS};
use survey_map_report::escape_markup;
use survey_map_survey_models::{DrawingMode, ReportMetadata, SurveyPoint};

/// Placemark name of the DISTANCE path.
pub const PATH_PLACEMARK: &str = "Survey Path (Distance)";

/// Placemark name of the AREA polygon.
pub const AREA_PLACEMARK: &str = "Survey Area";

/// `lng,lat,0` tuple as KML expects.
fn coordinate(point: &SurveyPoint) -> String {
    format!("{},{},0", point.lng, point.lat)
}

/// Placemark name for the point at 0-based `index`: override, then the
/// point's label, then `Point {n}`.
#[must_use]
pub fn placemark_name(index: usize, point: &SurveyPoint, metadata: &ReportMetadata) -> String {
    metadata
        .override_for(index)
        .or_else(|| point.label.as_deref().filter(|label| !label.is_empty()))
        .map_or_else(|| format!("Point {}", index + 1), str::to_string)
}

/// Builds the KML document.
///
/// Every point becomes a Placemark; DISTANCE mode with at least two points
/// adds a LineString, AREA mode with at least three points adds a Polygon
/// whose ring repeats the first coordinate at the end.
#[must_use]
pub fn build_kml(points: &[SurveyPoint], mode: DrawingMode, metadata: &ReportMetadata) -> String {
    let mut kml = String::with_capacity(1024 + points.len() * 160);

    let _ = write!(
        kml,
        r##"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>{}</name>
    <description>{}</description>
    <Style id="polyStyle">
      <LineStyle><color>ff0000ff</color><width>4</width></LineStyle>
      <PolyStyle><color>400000ff</color></PolyStyle>
    </Style>
    <Style id="lineStyle">
      <LineStyle><color>ff00aaff</color><width>4</width></LineStyle>
    </Style>"##,
        escape_markup(&metadata.title),
        escape_markup(&metadata.subtitle),
    );

    for (index, point) in points.iter().enumerate() {
        let _ = write!(
            kml,
            r"
    <Placemark>
      <name>{}</name>
      <Point>
        <coordinates>{}</coordinates>
      </Point>
    </Placemark>",
            escape_markup(&placemark_name(index, point, metadata)),
            coordinate(point),
        );
    }

    let tuples = || points.iter().map(coordinate).collect::<Vec<_>>();

    match mode {
        DrawingMode::Distance if points.len() >= MIN_PATH_POINTS => {
            let _ = write!(
                kml,
                r"
    <Placemark>
      <name>{PATH_PLACEMARK}</name>
      <styleUrl>#lineStyle</styleUrl>
      <LineString>
        <coordinates>{}</coordinates>
      </LineString>
    </Placemark>",
                tuples().join(" "),
            );
        }
        DrawingMode::Area if points.len() >= MIN_POLYGON_POINTS => {
            let mut ring = tuples();
            ring.push(coordinate(&points[0]));
            let _ = write!(
                kml,
                r"
    <Placemark>
      <name>{AREA_PLACEMARK}</name>
      <styleUrl>#polyStyle</styleUrl>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>{}</coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>",
                ring.join(" "),
            );
        }
        _ => {}
    }

    kml.push_str(
        r"
  </Document>
</kml>
",
    );
    kml
}
