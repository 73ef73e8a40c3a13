use petgraph::graph::NodeIndex;
use serde_json::json;

use crate::graph_builder::Graph;
use crate::miner::SifInteraction;
use crate::model::Element;
use crate::types::{EdgeKind, Sign};

/// Sorts interactions by key so output is stable between runs.
pub fn sorted(interactions: &[SifInteraction]) -> Vec<&SifInteraction> {
    let mut sorted: Vec<&SifInteraction> = interactions.iter().collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));
    sorted
}

pub fn format_sif(interactions: &[SifInteraction], header: Option<&str>) -> String {
    let mut output = String::new();
    if let Some(header) = header {
        output.push_str(header);
        output.push('\n');
    }
    for sif in sorted(interactions) {
        output.push_str(&sif.to_sif_line());
        output.push('\n');
    }
    output
}

// Fourth column lists mediator element ids separated by spaces
pub fn format_sif_with_mediators(interactions: &[SifInteraction], header: Option<&str>) -> String {
    let mut output = String::new();
    if let Some(header) = header {
        output.push_str(&format!("{header}\tmediators\n"));
    }
    for sif in sorted(interactions) {
        let mediators: Vec<&str> = sif.mediators.iter().map(String::as_str).collect();
        output.push_str(&format!("{}\t{}\n", sif.to_sif_line(), mediators.join(" ")));
    }
    output
}

pub fn format_sif_as_json(interactions: &[SifInteraction]) -> serde_json::Result<String> {
    let records: Vec<_> = sorted(interactions)
        .into_iter()
        .map(|sif| {
            json!({
                "source": sif.source(),
                "type": sif.relation(),
                "target": sif.target(),
                "sif_type": sif.sif_type.tag(),
                "directed": sif.directed,
                "evidence": sif.evidence.len(),
                "mediators": sif.mediators,
            })
        })
        .collect();

    serde_json::to_string_pretty(&json!({ "interactions": records }))
}

// Shape and color per wrapped element kind
fn node_style(element: &Element) -> (&'static str, &'static str, &'static str) {
    match element {
        Element::ProteinReference(_) => ("ellipse", "lightblue", "filled"),
        Element::SmallMoleculeReference(_) => ("ellipse", "lightyellow", "filled"),
        Element::Protein(_) => ("ellipse", "green", "filled"),
        Element::SmallMolecule(_) => ("ellipse", "yellow", "filled"),
        Element::Complex(_) => ("box", "orange", "filled,rounded"),
        Element::Control(_) => ("diamond", "grey", "filled"),
        Element::Conversion(_) => ("box", "violet", "filled"),
        Element::TemplateReaction(_) => ("box", "pink", "filled"),
        Element::Pathway(_) => ("folder", "white", "filled"),
    }
}

fn node_label(graph: &Graph<'_>, idx: NodeIndex) -> String {
    let node = graph.node(idx);
    let element = node.element;
    let mut base = match element.name() {
        Some(name) => format!("{} [{}]", element.id(), name),
        None => element.id().to_string(),
    };
    if let Some(location) = element.cellular_location() {
        base.push_str(&format!(" @{location}"));
    }
    match element.control_type() {
        Some(t) => format!("{base} ({t})"),
        None => base,
    }
}

pub fn format_graph_as_dot(graph: &Graph<'_>) -> String {
    let mut output = String::from("digraph {\n");

    output.push_str("    graph [fontname=\"Arial\", rankdir=TB, splines=true];\n");
    output.push_str("    node [fontname=\"Arial\"];\n");
    output.push_str("    edge [fontname=\"Arial\"];\n\n");

    for node_idx in graph.node_indices() {
        let (shape, color, style) = node_style(graph.element(node_idx));
        output.push_str(&format!(
            "    {} [label=\"{}\", shape={}, fillcolor=\"{}\", style=\"{}\"];\n",
            node_idx.index(),
            node_label(graph, node_idx).replace('"', "\\\""),
            shape,
            color,
            style
        ));
    }

    for edge_idx in graph.edge_indices() {
        let Some((source, target)) = graph.edge_endpoints(edge_idx) else {
            continue;
        };
        let edge = graph.edge(edge_idx);

        let color = match (edge.kind, edge.sign) {
            (EdgeKind::Controls, Sign::Positive) => "darkgreen",
            (EdgeKind::Controls, Sign::Negative) => "red",
            (EdgeKind::Controller, _) => "blue",
            (EdgeKind::Reference, _) | (EdgeKind::Component, _) => "gray",
            (EdgeKind::Input, _) | (EdgeKind::Output, _) => "black",
        };
        let arrowhead = match edge.sign {
            Sign::Positive => "normal",
            Sign::Negative => "tee",
        };

        output.push_str(&format!(
            "    {} -> {} [label=\"{}\", color=\"{}\", arrowhead={}];\n",
            source.index(),
            target.index(),
            edge.kind.label(),
            color,
            arrowhead
        ));
    }

    output.push_str("}\n");
    output
}
