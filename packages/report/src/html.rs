//! Printable HTML rendition of a [`ReportLayout`].
//!
//! The document is self-contained: print stylesheet, header, SVG map panel
//! with grid labels, inset, scale block, legend, coordinate listing, and
//! footer. Printing it yields one A4 landscape page.

use std::fmt::Write as _;

use crate::layout::{REPORT_BADGE, ReportLayout};
use crate::legend::LegendEntry;
use crate::markup::escape_markup;
use crate::panel::{INSET_PANEL, MAIN_PANEL, render_panel_svg};

const PRINT_CSS: &str = r"
@page { size: A4 landscape; margin: 0; }
body { margin: 0; background: #0f172a; font-family: 'Inter', 'Helvetica Neue', Arial, sans-serif; }
#report-frame { width: 1122px; min-height: 842px; margin: 0 auto; background: #fff; border: 12px double #000; padding: 32px; box-sizing: border-box; transform-origin: top center; }
.header { display: flex; justify-content: space-between; border-bottom: 8px solid #000; padding-bottom: 24px; margin-bottom: 24px; }
.header h1 { font-size: 48px; font-weight: 900; margin: 0 0 8px; letter-spacing: -0.04em; }
.header h2 { font-size: 16px; font-weight: 700; margin: 0; letter-spacing: 0.6em; color: #1e293b; }
.badge { background: #000; color: #fff; padding: 8px 20px; font-weight: 900; letter-spacing: 0.3em; font-size: 13px; }
.projection { font-family: monospace; font-size: 11px; opacity: 0.7; margin-top: 8px; text-align: right; }
.body { display: flex; gap: 24px; }
.map-column { width: 72%; }
.side-column { width: 28%; display: flex; flex-direction: column; gap: 16px; border-left: 6px solid #000; padding-left: 24px; }
.grid-row { display: flex; justify-content: space-around; font-size: 11px; font-weight: 900; }
.map-row { display: flex; align-items: stretch; gap: 8px; }
.grid-col { display: flex; flex-direction: column; justify-content: space-around; font-size: 10px; font-weight: 900; writing-mode: vertical-rl; transform: rotate(180deg); }
.panel { border: 8px solid #000; }
.box { border: 5px solid #000; padding: 12px; }
.box-title { background: #000; color: #fff; font-size: 11px; font-weight: 900; text-align: center; padding: 6px; letter-spacing: 0.2em; margin-bottom: 12px; }
.legend-row { display: flex; align-items: center; gap: 12px; font-size: 12px; font-weight: 900; text-transform: uppercase; margin-bottom: 6px; }
.legend-detail { margin-left: 40px; font-family: monospace; font-size: 10px; color: #475569; margin-bottom: 8px; }
.swatch { width: 24px; height: 24px; border: 3px solid #000; box-sizing: border-box; }
.swatch-line { width: 24px; height: 4px; }
.coords { font-family: monospace; font-size: 10px; border-top: 2px solid rgba(0,0,0,0.1); padding-top: 8px; }
.footer { display: flex; justify-content: space-between; border-top: 6px solid #000; margin-top: 24px; padding-top: 16px; font-weight: 900; letter-spacing: 0.4em; text-transform: uppercase; font-size: 14px; }
.footer .badge { letter-spacing: 0.8em; }
@media print {
  .no-print { display: none !important; }
  body { background: #fff; }
  #report-frame { transform: scale(0.9) !important; transform-origin: top left !important; margin: 0 !important; border: 12px double #000 !important; }
  .page-break { page-break-after: always; break-after: page; }
}
";

fn render_legend(out: &mut String, legend: &[LegendEntry]) {
    for entry in legend {
        match entry {
            LegendEntry::Symbol { icon, label } => {
                let _ = write!(
                    out,
                    r#"<div class="legend-row"><div class="swatch" data-icon="{}"></div><span>{}</span></div>"#,
                    escape_markup(icon),
                    escape_markup(label)
                );
            }
            LegendEntry::Distance {
                color,
                label,
                meters,
            } => {
                let _ = write!(
                    out,
                    r#"<div class="legend-row"><div class="swatch-line" style="background-color: {0}; border: 2px solid {0}"></div><span>{1}</span></div><div class="legend-detail">Length: {2} m</div>"#,
                    escape_markup(color),
                    escape_markup(label),
                    escape_markup(meters)
                );
            }
            LegendEntry::Area {
                color,
                label,
                hectares,
                perimeter_m,
            } => {
                let _ = write!(
                    out,
                    r#"<div class="legend-row"><div class="swatch" style="background-color: {}"></div><span>{}</span></div><div class="legend-detail"><div>Area: {} ha</div><div>Perimeter: {} m</div></div>"#,
                    escape_markup(color),
                    escape_markup(label),
                    escape_markup(hectares),
                    escape_markup(perimeter_m)
                );
            }
        }
    }
}

fn spans(values: &[String], suffix: &str) -> String {
    values
        .iter()
        .map(|v| format!("<span>{}{suffix}</span>", escape_markup(v)))
        .collect()
}

/// Renders the full printable document.
#[must_use]
pub fn render_html(layout: &ReportLayout) -> String {
    let metadata = &layout.metadata;
    let mut out = String::with_capacity(16 * 1024);

    let _ = write!(
        out,
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>{title}</title><style>{PRINT_CSS}</style></head><body>"#,
        title = escape_markup(&metadata.title),
    );
    let _ = write!(
        out,
        r#"<div id="report-frame" class="report-capture" style="transform: {}; margin-bottom: {:.1}px">"#,
        layout.display.css_transform(),
        layout.display.margin_bottom()
    );

    let _ = write!(
        out,
        r#"<div class="header"><div><h1>{}</h1><h2>{}</h2></div><div><div class="badge">VALIDATED GEOSPATIAL ANALYSIS</div><div class="projection">PROJECTION SYSTEM: WGS 1984</div></div></div>"#,
        escape_markup(&metadata.title),
        escape_markup(&metadata.subtitle)
    );

    out.push_str(r#"<div class="body"><div class="map-column">"#);
    let _ = write!(
        out,
        r#"<div class="grid-row">{}</div><div class="map-row"><div class="grid-col">{}</div><div class="panel" id="print-map">{}</div><div class="grid-col">{}</div></div><div class="grid-row">{}</div>"#,
        spans(&layout.grid.top, "°E"),
        spans(&layout.grid.left, "°N"),
        render_panel_svg("main", &layout.main_overlays, layout.frame.main_bounds, MAIN_PANEL),
        spans(&layout.grid.right, "°N"),
        spans(&layout.grid.bottom, "°E"),
    );
    out.push_str("</div>");

    out.push_str(r#"<div class="side-column">"#);
    let _ = write!(
        out,
        r#"<div class="box"><div class="box-title">INDEX MAP (SCALE {})</div><div id="inset-map">{}</div></div>"#,
        escape_markup(&layout.inset_scale_text),
        render_panel_svg("inset", &layout.inset_overlays, layout.frame.inset_bounds, INSET_PANEL)
    );
    let _ = write!(
        out,
        r#"<div class="box"><div style="display:flex;justify-content:space-around;align-items:center"><div style="font-weight:900;font-size:24px">N &#9650;</div><div style="font-size:11px;font-weight:900;letter-spacing:0.2em">SCALE {}</div></div></div>"#,
        escape_markup(&layout.scale_text)
    );

    out.push_str(r#"<div class="box"><div class="box-title">DYNAMIC LEGEND</div>"#);
    render_legend(&mut out, &layout.legend);
    if !layout.coordinates.is_empty() {
        out.push_str(r#"<div class="coords"><div style="opacity:0.3;font-weight:900">COORDINATE LIST:</div>"#);
        for row in &layout.coordinates {
            let _ = write!(out, "<div>{}</div>", escape_markup(&row.to_string()));
        }
        out.push_str("</div>");
    }
    out.push_str("</div></div></div>");

    let _ = write!(
        out,
        r#"<div class="footer"><div>Surveyor: {} | {}</div><div class="badge">{REPORT_BADGE}</div></div>"#,
        escape_markup(&metadata.surveyor),
        escape_markup(&metadata.date)
    );
    out.push_str(r#"</div><div class="page-break"></div></body></html>"#);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_map_map::PrintLayoutSizes;
    use survey_map_map::SurfaceController;
    use survey_map_map::memory::MemorySurfaceFactory;
    use survey_map_state::{Action, Store, SurveyState};
    use survey_map_survey_models::{DrawingMode, ReportMetadata, ViewMode};

    use crate::{ReportFrame, compose_report};

    fn layout_for(actions: Vec<Action>) -> ReportLayout {
        let mut store = Store::new(SurveyState::new(ReportMetadata::dated(
            chrono::NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        )));
        let mut controller = SurfaceController::new(MemorySurfaceFactory);
        let mut request = None;
        for action in actions.into_iter().chain([
            Action::SetView {
                view: ViewMode::Config,
            },
            Action::SetView {
                view: ViewMode::Print,
            },
        ]) {
            let changes = store.dispatch(action);
            request = controller.sync(store.state(), &changes).unwrap().or(request);
        }
        let request = request.unwrap();
        controller
            .layout_ready(request.generation, PrintLayoutSizes::default(), store.state())
            .unwrap()
            .unwrap();
        compose_report(store.state(), controller.print().unwrap())
    }

    #[test]
    fn stripped_layout_renders_at_full_scale() {
        let mut layout = layout_for(vec![Action::click(-6.2, 106.81)]);
        layout.display = ReportFrame::new(0.5);
        {
            let stripped = layout.strip_transform();
            assert!(render_html(&stripped).contains("transform: none;"));
        }
        assert!(render_html(&layout).contains("transform: scale(0.5000);"));
    }

    #[test]
    fn document_carries_print_stylesheet_and_header() {
        let layout = layout_for(vec![
            Action::click(-6.2, 106.81),
            Action::SetTitle {
                title: "ridge <north>".to_string(),
            },
        ]);
        let html = render_html(&layout);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("size: A4 landscape"));
        assert!(html.contains(".no-print { display: none !important; }"));
        assert!(html.contains("scale(0.9)"));
        assert!(html.contains("RIDGE &lt;NORTH&gt;"));
        assert!(!html.contains("<NORTH>"));
        assert!(html.contains("P1: -6.200000, 106.810000"));
        assert!(html.contains("SCALE AUTO"));
        assert!(html.contains("SCALE 1:50,000"));
    }

    #[test]
    fn area_report_draws_polygon_and_zone_legend() {
        let layout = layout_for(vec![
            Action::SetMode {
                mode: DrawingMode::Area,
            },
            Action::click(-6.200, 106.810),
            Action::click(-6.205, 106.815),
            Action::click(-6.198, 106.818),
        ]);
        let html = render_html(&layout);

        assert!(html.contains("<polygon"));
        assert!(html.contains("Forest Zone"));
        assert!(html.contains("Perimeter:"));
        assert_eq!(html.matches(r#"class="marker""#).count(), 3);
        // Footprint rectangle on the inset.
        assert!(html.contains(r##"stroke="#ef4444""##));
    }
}
