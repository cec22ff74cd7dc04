use std::cmp::Ordering;

use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;

use crate::pipeline::PartnerBalance;
use crate::views::FlowDiagramView;

/// Number of partners shown per side of the flow diagram.
pub const TOP_FLOWS: usize = 15;

/// The `k` heaviest import partners and, independently, the `k` heaviest
/// export partners. Partners with no trade at all are never shown; ties
/// keep input order.
pub fn top_flows(
    balances: &[PartnerBalance],
    k: usize,
) -> (Vec<&PartnerBalance>, Vec<&PartnerBalance>) {
    let active: Vec<&PartnerBalance> =
        balances.iter().filter(|b| b.total_trade > 0.0).collect();

    let mut imports = active.clone();
    imports.sort_by(|a, b| {
        b.import_quantity
            .partial_cmp(&a.import_quantity)
            .unwrap_or(Ordering::Equal)
    });
    imports.truncate(k);

    let mut exports = active;
    exports.sort_by(|a, b| {
        b.export_quantity
            .partial_cmp(&a.export_quantity)
            .unwrap_or(Ordering::Equal)
    });
    exports.truncate(k);

    (imports, exports)
}

/// Assemble the two-sided Sankey layout: every top import partner feeds the
/// central selection node, which feeds every top export partner. A partner
/// ranked on both sides gets two distinct nodes, one per side.
///
/// Node insertion order defines the label index space consumed by the
/// renderer, so imports are added first, then the center, then exports.
pub fn build_flow_diagram(
    balances: &[PartnerBalance],
    selected: &[String],
    k: usize,
    quantity_unit: &str,
) -> FlowDiagramView {
    let (top_imports, top_exports) = top_flows(balances, k);

    let mut graph: DiGraph<String, f64> = DiGraph::new();

    let import_nodes: Vec<_> = top_imports
        .iter()
        .map(|b| graph.add_node(format!("Import: {} ({})", b.partner, quantity_unit)))
        .collect();
    let center = graph.add_node(format!("{} ({})", selected.join(", "), quantity_unit));
    let export_nodes: Vec<_> = top_exports
        .iter()
        .map(|b| graph.add_node(format!("Export: {} ({})", b.partner, quantity_unit)))
        .collect();

    for (node, b) in import_nodes.iter().zip(&top_imports) {
        graph.add_edge(*node, center, b.import_quantity);
    }
    for (node, b) in export_nodes.iter().zip(&top_exports) {
        graph.add_edge(center, *node, b.export_quantity);
    }

    let labels = graph.node_weights().cloned().collect();
    let mut sources = Vec::with_capacity(graph.edge_count());
    let mut targets = Vec::with_capacity(graph.edge_count());
    let mut values = Vec::with_capacity(graph.edge_count());
    for edge in graph.edge_references() {
        sources.push(edge.source().index());
        targets.push(edge.target().index());
        values.push(*edge.weight());
    }

    FlowDiagramView {
        title: format!("Top {} Import/Export Flows (in {})", k, quantity_unit),
        labels,
        sources,
        targets,
        values,
    }
}
