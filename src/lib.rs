mod config;
mod error;
mod flows;
mod geo;
mod model;
mod pipeline;
pub mod schema;
mod views;

#[cfg(feature = "python")]
mod py;

pub use config::DatasetConfig;
pub use error::TradeError;
pub use flows::{build_flow_diagram, top_flows, TOP_FLOWS};
pub use geo::{CoordinateLookup, MemoizedLookup, StaticCoordinates};
pub use model::TradeModel;
pub use pipeline::{
    compute_balances, extract_balances, rank_partners, thousands, Direction, PartnerBalance,
    TOP_PARTNERS,
};
pub use views::{
    build_map_view, build_summary_table, fmt_quantity, fmt_value, Dashboard, FlowDiagramView,
    MapPoint, MapView, SelectedMarker, SummaryRow, SummaryTable,
};
