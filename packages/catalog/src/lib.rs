#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Compile-time registry of boundary themes, point symbols, and tile layers.
//!
//! Each entry is defined in a TOML file under `themes/`, `symbols/`, or
//! `layers/`. The registry embeds these at compile time and exposes them in
//! their declared `order`, so the first theme and first symbol are the
//! session defaults.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use survey_map_survey_models::{BoundaryStyle, MapLayer, PointSymbol};

/// Errors from catalog lookups.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No theme carries the requested label.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// No symbol carries the requested icon id or label.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
}

/// A tile source for one [`MapLayer`].
#[derive(Debug, Clone, Deserialize)]
pub struct TileLayer {
    /// Which toggle value this source serves.
    pub layer: MapLayer,
    /// Human-readable name.
    pub name: String,
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders.
    pub url: String,
    /// Highest zoom level the source serves.
    pub max_zoom: u8,
}

#[derive(Debug, Deserialize)]
struct ThemeEntry {
    order: u32,
    label: String,
    color: String,
    fill_color: String,
}

#[derive(Debug, Deserialize)]
struct SymbolEntry {
    order: u32,
    icon: String,
    label: String,
    category: String,
}

// ── Compile-time embedded TOML files ────────────────────────────────

const THEME_TOMLS: &[(&str, &str)] = &[
    ("forest", include_str!("../themes/forest.toml")),
    ("hazard", include_str!("../themes/hazard.toml")),
    ("nautical", include_str!("../themes/nautical.toml")),
    ("tactical", include_str!("../themes/tactical.toml")),
    ("technical", include_str!("../themes/technical.toml")),
];

const SYMBOL_TOMLS: &[(&str, &str)] = &[
    ("marker", include_str!("../symbols/marker.toml")),
    ("boundary", include_str!("../symbols/boundary.toml")),
    ("tree", include_str!("../symbols/tree.toml")),
    ("house", include_str!("../symbols/house.toml")),
    ("power", include_str!("../symbols/power.toml")),
    ("hazard", include_str!("../symbols/hazard.toml")),
];

const LAYER_TOMLS: &[(&str, &str)] = &[
    ("street", include_str!("../layers/street.toml")),
    ("satellite", include_str!("../layers/satellite.toml")),
];

fn parse_all<T: DeserializeOwned>(kind: &str, tomls: &[(&str, &str)]) -> Vec<T> {
    tomls
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse {kind} '{name}': {e}"))
        })
        .collect()
}

/// Returns every boundary theme in declared order.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_themes() -> Vec<BoundaryStyle> {
    let mut entries: Vec<ThemeEntry> = parse_all("theme", THEME_TOMLS);
    entries.sort_by_key(|e| e.order);
    entries
        .into_iter()
        .map(|e| BoundaryStyle {
            color: e.color,
            fill_color: e.fill_color,
            label: e.label,
        })
        .collect()
}

/// Returns every point symbol in declared order.
///
/// # Panics
///
/// Panics if any TOML config is malformed.
#[must_use]
pub fn all_symbols() -> Vec<PointSymbol> {
    let mut entries: Vec<SymbolEntry> = parse_all("symbol", SYMBOL_TOMLS);
    entries.sort_by_key(|e| e.order);
    entries
        .into_iter()
        .map(|e| PointSymbol {
            icon: e.icon,
            label: e.label,
            category: e.category,
        })
        .collect()
}

/// Returns both tile layers.
///
/// # Panics
///
/// Panics if any TOML config is malformed.
#[must_use]
pub fn all_layers() -> Vec<TileLayer> {
    parse_all("tile layer", LAYER_TOMLS)
}

/// The theme active at session start.
///
/// # Panics
///
/// Panics if the theme registry is empty.
#[must_use]
pub fn default_theme() -> BoundaryStyle {
    all_themes()
        .into_iter()
        .next()
        .expect("theme registry is empty")
}

/// The symbol active at session start.
///
/// # Panics
///
/// Panics if the symbol registry is empty.
#[must_use]
pub fn default_symbol() -> PointSymbol {
    all_symbols()
        .into_iter()
        .next()
        .expect("symbol registry is empty")
}

/// Looks up a theme by its display label (case-insensitive).
///
/// # Errors
///
/// Returns [`CatalogError::UnknownTheme`] when no theme matches.
pub fn theme_by_label(label: &str) -> Result<BoundaryStyle, CatalogError> {
    all_themes()
        .into_iter()
        .find(|t| t.label.eq_ignore_ascii_case(label))
        .ok_or_else(|| CatalogError::UnknownTheme(label.to_string()))
}

/// Looks up a symbol by icon id or display label (case-insensitive).
///
/// # Errors
///
/// Returns [`CatalogError::UnknownSymbol`] when no symbol matches.
pub fn symbol_by_icon(key: &str) -> Result<PointSymbol, CatalogError> {
    all_symbols()
        .into_iter()
        .find(|s| s.icon == key || s.label.eq_ignore_ascii_case(key))
        .ok_or_else(|| CatalogError::UnknownSymbol(key.to_string()))
}

/// URL template for the given base layer.
///
/// # Panics
///
/// Panics if the layer registry has no entry for `layer`.
#[must_use]
pub fn tile_url(layer: MapLayer) -> String {
    all_layers()
        .into_iter()
        .find(|l| l.layer == layer)
        .map(|l| l.url)
        .unwrap_or_else(|| panic!("No tile layer registered for {layer}"))
}

#[cfg(test)]
const EXPECTED_THEME_COUNT: usize = 5;

#[cfg(test)]
const EXPECTED_SYMBOL_COUNT: usize = 6;
