/// View builders: turn `PartnerBalance` rows into the serializable
/// structures the front end renders. No aggregation happens here.
use serde::Serialize;

use crate::geo::CoordinateLookup;
use crate::pipeline::{thousands, Direction, PartnerBalance};

fn direction_color(direction: Direction) -> &'static str {
    match direction {
        Direction::ExportSurplus => "green",
        Direction::ImportSurplus => "red",
        Direction::Balanced => "gray",
    }
}

// ── Map ─────────────────────────────────────────────────────────────────────

/// One plotted partner on the geographic map.
#[derive(Debug, Clone, Serialize)]
pub struct MapPoint {
    pub partner: String,
    pub lat: f64,
    pub lon: f64,
    pub size: f64,
    pub color: &'static str,
    pub text: String,
}

/// Marker for a selected reporting country.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedMarker {
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Geographic scatter view. Partners the lookup could not resolve are
/// absent here but still appear in the summary table.
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub title: String,
    pub points: Vec<MapPoint>,
    pub selected: Vec<SelectedMarker>,
    /// Plotly area-mode scaling: 2 * max(size) / 40^2.
    pub size_ref: f64,
    pub size_min: f64,
}

pub fn build_map_view(
    balances: &[PartnerBalance],
    selected: &[String],
    lookup: &mut dyn CoordinateLookup,
    title: &str,
) -> MapView {
    let points: Vec<MapPoint> = balances
        .iter()
        .filter_map(|b| {
            let (lat, lon) = b.coordinates?;
            Some(MapPoint {
                partner: b.partner.clone(),
                lat,
                lon,
                size: b.marker_size,
                color: direction_color(b.direction),
                text: b.tooltip_text.clone(),
            })
        })
        .collect();

    let selected_markers = selected
        .iter()
        .filter_map(|country| {
            let (lat, lon) = lookup.resolve(country)?;
            Some(SelectedMarker {
                country: country.clone(),
                lat,
                lon,
            })
        })
        .collect();

    let max_size = points.iter().map(|p| p.size).fold(0.0f64, f64::max);

    MapView {
        title: format!("{} - {}", title, selected.join(", ")),
        points,
        selected: selected_markers,
        size_ref: 2.0 * max_size / (40.0 * 40.0),
        size_min: 4.0,
    }
}

// ── Flow diagram ────────────────────────────────────────────────────────────

/// Sankey-style flow layout: parallel label/index arrays as consumed by a
/// plotly Sankey trace.
#[derive(Debug, Clone, Serialize)]
pub struct FlowDiagramView {
    pub title: String,
    pub labels: Vec<String>,
    pub sources: Vec<usize>,
    pub targets: Vec<usize>,
    pub values: Vec<f64>,
}

// ── Summary table ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub partner: String,
    pub import_quantity: f64,
    pub export_quantity: f64,
    pub import_value: f64,
    pub export_value: f64,
    pub total_trade: f64,
}

/// Ranked partner table. Cells stay unrounded; display formatting is up to
/// `fmt_quantity` / `fmt_value`.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryTable {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

pub fn build_summary_table(
    ranked: &[PartnerBalance],
    k: usize,
    quantity_unit: &str,
    value_unit: &str,
) -> SummaryTable {
    let rows = ranked
        .iter()
        .map(|b| SummaryRow {
            partner: b.partner.clone(),
            import_quantity: b.import_quantity,
            export_quantity: b.export_quantity,
            import_value: b.import_value,
            export_value: b.export_value,
            total_trade: b.total_trade,
        })
        .collect();

    SummaryTable {
        title: format!("Top {} Partners by Volume", k),
        columns: vec![
            "Partner".to_string(),
            format!("Import Quantity ({})", quantity_unit.to_uppercase()),
            format!("Export Quantity ({})", quantity_unit.to_uppercase()),
            format!("Import Value ({})", value_unit),
            format!("Export Value ({})", value_unit),
            "Total Trade".to_string(),
        ],
        rows,
    }
}

/// Thousands-separated quantity: 1234567.8 -> "1,234,568".
pub fn fmt_quantity(x: f64) -> String {
    thousands(x)
}

/// Thousands-separated monetary value: 1234567.8 -> "$1,234,568".
pub fn fmt_value(x: f64) -> String {
    format!("${}", thousands(x))
}

// ── Dashboard ───────────────────────────────────────────────────────────────

/// Everything one selection renders: map, flow diagram, ranked table.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub map: MapView,
    pub flows: FlowDiagramView,
    pub table: SummaryTable,
}
