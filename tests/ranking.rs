use trade_flowkit::{rank_partners, Direction, PartnerBalance};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn balance(partner: &str, import_quantity: f64, export_quantity: f64) -> PartnerBalance {
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
        coordinates: None,
        tooltip_text: String::new(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// At most `k` rows come back, sorted descending by total trade.
#[test]
fn ranking_caps_and_sorts_by_total_trade() {
    let balances = vec![
        balance("X", 10.0, 10.0),
        balance("Y", 50.0, 50.0),
        balance("Z", 30.0, 30.0),
    ];

    let ranked = rank_partners(&balances, 2);

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].partner, "Y");
    assert_eq!(ranked[1].partner, "Z");
}

/// Duplicate partner keys are combined before ranking; quantities, values,
/// and total trade sum across the duplicates.
#[test]
fn duplicate_partner_rows_are_combined() {
    let balances = vec![
        balance("X", 10.0, 5.0),
        balance("Y", 1.0, 1.0),
        balance("X", 20.0, 15.0),
    ];

    let ranked = rank_partners(&balances, 10);

    assert_eq!(ranked.len(), 2);
    let x = &ranked[0];
    assert_eq!(x.partner, "X");
    assert_eq!(x.import_quantity, 30.0);
    assert_eq!(x.export_quantity, 20.0);
    assert_eq!(x.total_trade, 50.0);
    assert_eq!(x.balance, -10.0);
    assert_eq!(x.direction, Direction::ImportSurplus);
}

/// The total trade returned never exceeds the total trade handed in.
#[test]
fn returned_total_trade_is_bounded_by_input() {
    let balances = vec![
        balance("V", 5.0, 5.0),
        balance("W", 15.0, 5.0),
        balance("X", 25.0, 5.0),
        balance("Y", 35.0, 5.0),
        balance("Z", 45.0, 5.0),
    ];
    let input_total: f64 = balances.iter().map(|b| b.total_trade).sum();

    let ranked = rank_partners(&balances, 3);
    let ranked_total: f64 = ranked.iter().map(|b| b.total_trade).sum();

    assert!(ranked_total <= input_total);
}

/// Equal totals keep input order (stable sort).
#[test]
fn equal_totals_keep_input_order() {
    let balances = vec![
        balance("First", 20.0, 20.0),
        balance("Second", 20.0, 20.0),
        balance("Third", 50.0, 50.0),
    ];

    let ranked = rank_partners(&balances, 10);

    assert_eq!(ranked[0].partner, "Third");
    assert_eq!(ranked[1].partner, "First");
    assert_eq!(ranked[2].partner, "Second");
}

/// An empty input ranks to an empty output.
#[test]
fn empty_input_ranks_empty() {
    let ranked = rank_partners(&[], 10);
    assert!(ranked.is_empty());
}
