//! The report page as one SVG document.
//!
//! This is what the PNG export rasterizes: header, main map with graticule
//! labels, inset, scale block, legend, coordinate listing, and footer, laid
//! out on the fixed 1122 x 794 frame. The on-screen display transform is
//! applied as a root scale, so a capture taken while the frame is scaled
//! down shows the page scaled down too.

use std::fmt::Write as _;

use survey_map_state::{REPORT_FRAME_HEIGHT_PX, REPORT_FRAME_WIDTH_PX};

use crate::grid::GRID_FRACTIONS;
use crate::layout::{REPORT_BADGE, ReportLayout};
use crate::legend::LegendEntry;
use crate::markup::escape_markup;
use crate::panel::{INSET_PANEL, MAIN_PANEL, write_panel_group};

/// Font stack used for report text.
pub const SHEET_FONT: &str = "DejaVu Sans, Liberation Sans, Arial, Helvetica, sans-serif";

const MONO_FONT: &str = "DejaVu Sans Mono, Liberation Mono, Courier New, monospace";

/// Top-left corner of the main map panel.
pub const MAIN_ORIGIN: (f64, f64) = (40.0, 148.0);

/// Top-left corner of the inset panel.
pub const INSET_ORIGIN: (f64, f64) = (846.0, 176.0);

/// Left edge and width of the side column.
pub const SIDE_COLUMN: (f64, f64) = (838.0, 256.0);

const HEADER_RULE_Y: f64 = 112.0;
const FOOTER_RULE_Y: f64 = 724.0;
const SCALE_BOX_Y: f64 = 366.0;
const LEGEND_TITLE_Y: f64 = 410.0;
const LIST_BOTTOM: f64 = 716.0;
const LIST_LINE: f64 = 12.0;

struct Sheet {
    svg: String,
}

impl Sheet {
    fn rect(&mut self, (x, y, w, h): (f64, f64, f64, f64), paint: &str) {
        let _ = write!(
            self.svg,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" {paint}/>"#
        );
    }

    fn text(&mut self, (x, y): (f64, f64), style: &str, text: &str) {
        let _ = write!(
            self.svg,
            r#"<text x="{x:.1}" y="{y:.1}" {style}>{}</text>"#,
            escape_markup(text)
        );
    }

    /// Black title bar across the side column.
    fn title_bar(&mut self, y: f64, title: &str) {
        let (left, width) = SIDE_COLUMN;
        self.rect((left, y, width, 20.0), r##"fill="#000000""##);
        self.text(
            (width.mul_add(0.5, left), y + 14.0),
            r##"text-anchor="middle" font-size="10" font-weight="900" letter-spacing="2" fill="#ffffff""##,
            title,
        );
    }

    /// Frame edge around a panel at `origin`.
    fn panel_border(&mut self, (x, y): (f64, f64), (w, h): (f64, f64), weight: f64) {
        let half = weight / 2.0;
        self.rect(
            (x - half, y - half, w + weight, h + weight),
            &format!(r##"fill="none" stroke="#000000" stroke-width="{weight}""##),
        );
    }

    fn page(&mut self) {
        let (w, h) = page_size();
        self.rect((0.0, 0.0, w, h), r##"fill="#000000""##);
        self.rect((4.0, 4.0, w - 8.0, h - 8.0), r##"fill="#ffffff""##);
        self.rect(
            (12.0, 12.0, w - 24.0, h - 24.0),
            r##"fill="none" stroke="#000000" stroke-width="4""##,
        );
        self.rect((14.0, HEADER_RULE_Y, w - 28.0, 8.0), r##"fill="#000000""##);
        self.rect((14.0, FOOTER_RULE_Y, w - 28.0, 6.0), r##"fill="#000000""##);
        self.rect(
            (SIDE_COLUMN.0 - 16.0, MAIN_ORIGIN.1, 5.0, FOOTER_RULE_Y - MAIN_ORIGIN.1 - 12.0),
            r##"fill="#000000""##,
        );
    }

    fn header(&mut self, layout: &ReportLayout) {
        let metadata = &layout.metadata;
        self.text(
            (44.0, 72.0),
            r#"font-size="40" font-weight="900" letter-spacing="-1""#,
            &metadata.title,
        );
        self.text(
            (46.0, 100.0),
            r##"font-size="14" font-weight="700" letter-spacing="6" fill="#1e293b""##,
            &metadata.subtitle,
        );
        self.rect((778.0, 40.0, 300.0, 30.0), r##"fill="#000000""##);
        self.text(
            (928.0, 60.0),
            r##"text-anchor="middle" font-size="12" font-weight="900" letter-spacing="3" fill="#ffffff""##,
            "VALIDATED GEOSPATIAL ANALYSIS",
        );
        self.text(
            (1078.0, 94.0),
            &format!(r#"text-anchor="end" font-size="10" font-family="{MONO_FONT}" opacity="0.7""#),
            "PROJECTION SYSTEM: WGS 1984",
        );
    }

    fn main_map(&mut self, layout: &ReportLayout) {
        let (x, y) = MAIN_ORIGIN;
        let (w, h) = MAIN_PANEL;
        write_panel_group(
            &mut self.svg,
            "main",
            &layout.main_overlays,
            layout.frame.main_bounds,
            MAIN_PANEL,
            MAIN_ORIGIN,
        );
        self.panel_border(MAIN_ORIGIN, MAIN_PANEL, 4.0);

        let edge = r#"text-anchor="middle" font-size="10" font-weight="900""#;
        for (i, fraction) in GRID_FRACTIONS.iter().enumerate() {
            let gx = w.mul_add(*fraction, x);
            let gy = h.mul_add(1.0 - fraction, y);
            if let Some(lng) = layout.grid.top.get(i) {
                self.text((gx, y - 10.0), edge, &format!("{lng}°E"));
            }
            if let Some(lng) = layout.grid.bottom.get(i) {
                self.text((gx, y + h + 18.0), edge, &format!("{lng}°E"));
            }
            if let Some(lat) = layout.grid.left.get(i) {
                let _ = write!(
                    self.svg,
                    r#"<text transform="translate({:.1} {gy:.1}) rotate(-90)" {edge}>{}</text>"#,
                    x - 10.0,
                    escape_markup(&format!("{lat}°N"))
                );
            }
            if let Some(lat) = layout.grid.right.get(i) {
                let _ = write!(
                    self.svg,
                    r#"<text transform="translate({:.1} {gy:.1}) rotate(-90)" {edge}>{}</text>"#,
                    x + w + 18.0,
                    escape_markup(&format!("{lat}°N"))
                );
            }
        }
    }

    fn inset(&mut self, layout: &ReportLayout) {
        self.title_bar(
            MAIN_ORIGIN.1,
            &format!("INDEX MAP (SCALE {})", layout.inset_scale_text),
        );
        write_panel_group(
            &mut self.svg,
            "inset",
            &layout.inset_overlays,
            layout.frame.inset_bounds,
            INSET_PANEL,
            INSET_ORIGIN,
        );
        self.panel_border(INSET_ORIGIN, INSET_PANEL, 3.0);
    }

    fn scale_block(&mut self, layout: &ReportLayout) {
        let (left, width) = SIDE_COLUMN;
        self.rect(
            (left + 2.0, SCALE_BOX_Y, width - 4.0, 34.0),
            r##"fill="none" stroke="#000000" stroke-width="4""##,
        );
        self.text(
            (left + 30.0, SCALE_BOX_Y + 24.0),
            r#"font-size="18" font-weight="900""#,
            "N \u{25b2}",
        );
        self.text(
            (left + 160.0, SCALE_BOX_Y + 22.0),
            r#"text-anchor="middle" font-size="11" font-weight="900" letter-spacing="2""#,
            &format!("SCALE {}", layout.scale_text),
        );
    }

    /// Legend rows; returns the y below the last row.
    fn legend(&mut self, legend: &[LegendEntry]) -> f64 {
        self.title_bar(LEGEND_TITLE_Y, "DYNAMIC LEGEND");
        let left = SIDE_COLUMN.0 + 8.0;
        let label_x = left + 24.0;
        let label = r#"font-size="11" font-weight="900""#;
        let detail = format!(r##"font-size="9" font-family="{MONO_FONT}" fill="#475569""##);
        let mut y = LEGEND_TITLE_Y + 30.0;

        for entry in legend {
            match entry {
                LegendEntry::Symbol { label: text, .. } => {
                    self.rect(
                        (left, y, 16.0, 16.0),
                        r##"fill="#ffffff" stroke="#000000" stroke-width="2""##,
                    );
                    self.text((label_x, y + 12.0), label, &text.to_uppercase());
                    y += 22.0;
                }
                LegendEntry::Distance {
                    color,
                    label: text,
                    meters,
                } => {
                    self.rect(
                        (left, y + 6.0, 16.0, 4.0),
                        &format!(r#"fill="{}""#, escape_markup(color)),
                    );
                    self.text((label_x, y + 12.0), label, &text.to_uppercase());
                    self.text((label_x, y + 25.0), &detail, &format!("Length: {meters} m"));
                    y += 34.0;
                }
                LegendEntry::Area {
                    color,
                    label: text,
                    hectares,
                    perimeter_m,
                } => {
                    self.rect(
                        (left, y, 16.0, 16.0),
                        &format!(
                            r##"fill="{}" stroke="#000000" stroke-width="2""##,
                            escape_markup(color)
                        ),
                    );
                    self.text((label_x, y + 12.0), label, &text.to_uppercase());
                    self.text((label_x, y + 25.0), &detail, &format!("Area: {hectares} ha"));
                    self.text(
                        (label_x, y + 36.0),
                        &detail,
                        &format!("Perimeter: {perimeter_m} m"),
                    );
                    y += 46.0;
                }
            }
        }
        y
    }

    /// Coordinate rows below the legend, cut off with a `+N MORE` line
    /// when the column runs out.
    fn coordinates(&mut self, layout: &ReportLayout, top: f64) {
        if layout.coordinates.is_empty() {
            return;
        }
        let (left, width) = SIDE_COLUMN;
        self.rect((left + 8.0, top, width - 16.0, 1.5), r##"fill="#000000" opacity="0.1""##);
        self.text(
            (left + 8.0, top + 14.0),
            r#"font-size="9" font-weight="900" opacity="0.3""#,
            "COORDINATE LIST:",
        );

        let style = format!(r#"font-size="9" font-family="{MONO_FONT}""#);
        let first = top + 14.0 + LIST_LINE;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let capacity = ((LIST_BOTTOM - first) / LIST_LINE).floor().max(0.0) as usize + 1;
        let total = layout.coordinates.len();
        let shown = if total > capacity {
            capacity.saturating_sub(1)
        } else {
            total
        };

        let mut y = first;
        for row in layout.coordinates.iter().take(shown) {
            self.text((left + 8.0, y), &style, &row.to_string());
            y += LIST_LINE;
        }
        if shown < total {
            self.text((left + 8.0, y), &style, &format!("+{} MORE", total - shown));
        }
    }

    fn footer(&mut self, layout: &ReportLayout) {
        let metadata = &layout.metadata;
        self.text(
            (44.0, 762.0),
            r#"font-size="13" font-weight="900" letter-spacing="4""#,
            &format!(
                "SURVEYOR: {} | {}",
                metadata.surveyor,
                metadata.date.to_uppercase()
            ),
        );
        self.rect((858.0, 742.0, 236.0, 32.0), r##"fill="#000000""##);
        self.text(
            (976.0, 763.0),
            r##"text-anchor="middle" font-size="12" font-weight="900" letter-spacing="6" fill="#ffffff""##,
            REPORT_BADGE,
        );
    }
}

/// Page size in frame pixels.
#[must_use]
pub fn page_size() -> (f64, f64) {
    (
        f64::from(REPORT_FRAME_WIDTH_PX),
        f64::from(REPORT_FRAME_HEIGHT_PX),
    )
}

/// Renders the whole report page.
#[must_use]
pub fn render_report_svg(layout: &ReportLayout) -> String {
    let (w, h) = page_size();
    let scale = layout.display.effective_scale();
    let mut sheet = Sheet {
        svg: String::with_capacity(32 * 1024),
    };

    let _ = write!(
        sheet.svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{SHEET_FONT}"><g transform="scale({scale})">"#
    );
    sheet.page();
    sheet.header(layout);
    sheet.main_map(layout);
    sheet.inset(layout);
    sheet.scale_block(layout);
    let below_legend = sheet.legend(&layout.legend);
    sheet.coordinates(layout, below_legend + 4.0);
    sheet.footer(layout);
    sheet.svg.push_str("</g></svg>");

    log::debug!(
        "render_report_svg: {} bytes at display scale {scale:.3}",
        sheet.svg.len()
    );
    sheet.svg
}
