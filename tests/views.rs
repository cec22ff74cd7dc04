use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use trade_flowkit::{
    build_map_view, build_summary_table, fmt_quantity, fmt_value, rank_partners, thousands,
    CoordinateLookup, Direction, MemoizedLookup, PartnerBalance, StaticCoordinates,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn balance(
    partner: &str,
    import_quantity: f64,
    export_quantity: f64,
    coordinates: Option<(f64, f64)>,
) -> PartnerBalance {
    let balance = export_quantity - import_quantity;
    let total_trade = import_quantity + export_quantity;
    PartnerBalance {
        partner: partner.to_string(),
        import_quantity,
        export_quantity,
        import_value: import_quantity / 10.0,
        export_value: export_quantity / 10.0,
        balance,
        direction: Direction::from_balance(balance),
        total_trade,
        marker_size: total_trade.sqrt() / 100.0,
        coordinates,
        tooltip_text: format!("{partner} tooltip"),
    }
}

fn selection(countries: &[&str]) -> Vec<String> {
    countries.iter().map(|c| c.to_string()).collect()
}

/// Inner lookup that counts how often it is actually consulted.
struct CountingLookup {
    calls: Arc<AtomicUsize>,
    known: &'static str,
}

impl CoordinateLookup for CountingLookup {
    fn resolve(&mut self, name: &str) -> Option<(f64, f64)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (name == self.known).then_some((1.0, 2.0))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Partners without coordinates are dropped from the map but stay in the
/// ranked table.
#[test]
fn map_drops_unresolved_partners_but_table_keeps_them() {
    let balances = vec![
        balance("Germany", 100.0, 30.0, Some((51.17, 10.45))),
        balance("Atlantis", 500.0, 500.0, None),
    ];

    let mut lookup = StaticCoordinates::new();
    let map = build_map_view(&balances, &selection(&["France"]), &mut lookup, "PET");
    assert_eq!(map.points.len(), 1);
    assert_eq!(map.points[0].partner, "Germany");

    let table = build_summary_table(&rank_partners(&balances, 10), 10, "kg", "1000 USD");
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].partner, "Atlantis", "ranked by total trade");
}

/// Marker colors map the balance direction: green for export surplus, red
/// for import surplus, gray for balanced.
#[test]
fn marker_colors_follow_direction() {
    let balances = vec![
        balance("Red", 100.0, 10.0, Some((0.0, 0.0))),
        balance("Green", 10.0, 100.0, Some((0.0, 1.0))),
        balance("Gray", 50.0, 50.0, Some((0.0, 2.0))),
    ];

    let mut lookup = StaticCoordinates::new();
    let map = build_map_view(&balances, &selection(&["A"]), &mut lookup, "PET");

    let color_of = |name: &str| {
        map.points
            .iter()
            .find(|p| p.partner == name)
            .unwrap()
            .color
    };
    assert_eq!(color_of("Red"), "red");
    assert_eq!(color_of("Green"), "green");
    assert_eq!(color_of("Gray"), "gray");
}

/// Selected reporters with known coordinates get their own markers; the
/// title names the whole selection.
#[test]
fn selected_markers_and_title_cover_the_selection() {
    let balances = vec![balance("China", 10.0, 20.0, Some((35.86, 104.20)))];

    let mut lookup = StaticCoordinates::new();
    let map = build_map_view(
        &balances,
        &selection(&["Germany", "Atlantis", "France"]),
        &mut lookup,
        "PET Trade Balance",
    );

    assert_eq!(map.title, "PET Trade Balance - Germany, Atlantis, France");
    let marked: Vec<&str> = map.selected.iter().map(|m| m.country.as_str()).collect();
    assert_eq!(marked, vec!["Germany", "France"]);
}

/// Plotly area-mode scaling hints derive from the largest marker.
#[test]
fn size_ref_scales_from_largest_marker() {
    let balances = vec![
        balance("Small", 1.0, 0.0, Some((0.0, 0.0))),
        balance("Big", 10_000.0, 10_000.0, Some((1.0, 1.0))),
    ];

    let mut lookup = StaticCoordinates::new();
    let map = build_map_view(&balances, &selection(&["A"]), &mut lookup, "PET");

    let max_size = 20_000.0_f64.sqrt() / 100.0;
    assert!((map.size_ref - 2.0 * max_size / 1600.0).abs() < 1e-12);
    assert_eq!(map.size_min, 4.0);
}

/// Table headers carry the configured units.
#[test]
fn table_headers_carry_units() {
    let table = build_summary_table(&[], 10, "kg", "1000 USD");

    assert_eq!(
        table.columns,
        vec![
            "Partner",
            "Import Quantity (KG)",
            "Export Quantity (KG)",
            "Import Value (1000 USD)",
            "Export Value (1000 USD)",
            "Total Trade",
        ]
    );
}

/// Views serialize to JSON for whatever front end consumes them.
#[test]
fn views_serialize_to_json() {
    let balances = vec![balance("Germany", 100.0, 30.0, Some((51.17, 10.45)))];
    let mut lookup = StaticCoordinates::new();
    let map = build_map_view(&balances, &selection(&["France"]), &mut lookup, "PET");

    let json = serde_json::to_string(&map).unwrap();
    assert!(json.contains("\"size_ref\""));
    assert!(json.contains("\"Germany\""));
}

/// Display formatting is thousands-separated with zero decimals; the
/// underlying numbers stay unrounded.
#[test]
fn display_formatting_matches_the_dashboard() {
    assert_eq!(thousands(0.0), "0");
    assert_eq!(thousands(999.4), "999");
    assert_eq!(thousands(1000.0), "1,000");
    assert_eq!(thousands(-70.0), "-70");
    assert_eq!(fmt_quantity(1_234_567.89), "1,234,568");
    assert_eq!(fmt_value(1_234_567.89), "$1,234,568");
}

/// The memoizing wrapper consults its inner lookup once per distinct
/// name; misses are memoized too.
#[test]
fn memoized_lookup_consults_inner_once_per_name() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut lookup = MemoizedLookup::new(CountingLookup {
        calls: Arc::clone(&calls),
        known: "Germany",
    });

    assert_eq!(lookup.resolve("Germany"), Some((1.0, 2.0)));
    assert_eq!(lookup.resolve("Germany"), Some((1.0, 2.0)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(lookup.resolve("Atlantis"), None);
    assert_eq!(lookup.resolve("Atlantis"), None);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    assert_eq!(lookup.cached_len(), 2);
}
