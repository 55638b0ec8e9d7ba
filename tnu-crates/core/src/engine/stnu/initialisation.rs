use log::debug;
use log::warn;

use super::StnuLink;
use crate::basic_types::CheckStatus;
use crate::basic_types::StructuralError;
use crate::graph::CaseKind;
use crate::graph::CaseValue;
use crate::graph::ConstraintKind;
use crate::graph::EdgeData;
use crate::graph::EdgeId;
use crate::graph::Node;
use crate::graph::StnuEdge;
use crate::graph::StnuGraph;

/// Prepares `graph` for a controllability check and returns its contingent links.
pub(crate) fn initialise_stnu(
    graph: &mut StnuGraph,
    status: &mut CheckStatus,
) -> Result<Vec<StnuLink>, StructuralError> {
    let z = match graph.z().or_else(|| graph.find_node("Z")) {
        Some(z) => z,
        None => {
            let fix = "added the missing node Z".to_owned();
            warn!("{fix}");
            status.fixes.push(fix);
            graph
                .add_node(Node::new("Z"))
                .unwrap_or_else(|| unreachable!("no node is called Z"))
        }
    };
    graph.set_z(z);

    for node in graph.nodes().filter(|&node| node != z).collect::<Vec<_>>() {
        let _ = super::tighten(graph, node, z, 0);
    }

    let mut links = Vec::new();
    for edge in graph.contingent_edges().to_vec() {
        if let Some(link) = contingent_link(graph, edge)? {
            links.push(link);
        }
    }
    for link in &links {
        set_case_values(graph, link)?;
    }
    links.sort_by_key(|link| link.contingent);
    Ok(links)
}

/// The link of which `edge` is the edge from the activation node; `None` for the edge from the
/// contingent node.
fn contingent_link(graph: &StnuGraph, edge: EdgeId) -> Result<Option<StnuLink>, StructuralError> {
    let (source, target) = graph.endpoints(edge);
    let name = || graph.edge_name(edge).to_owned();
    let companion = graph
        .find_edge(target, source)
        .filter(|&companion| graph.edge(companion).kind() == ConstraintKind::Contingent)
        .ok_or_else(|| StructuralError::MissingCompanion { edge: name() })?;

    let value = graph
        .edge(edge)
        .value()
        .ok_or_else(|| StructuralError::EmptyContingentEdge { edge: name() })?;
    let companion_value = graph.edge(companion).value().ok_or_else(|| {
        StructuralError::EmptyContingentEdge {
            edge: graph.edge_name(companion).to_owned(),
        }
    })?;

    // The edge with the larger value goes from the activation node to the contingent node.
    if value < companion_value || (value == companion_value && edge > companion) {
        return Ok(None);
    }
    let (lower, upper) = (-companion_value, value);
    if lower < 0 || upper <= lower {
        return Err(StructuralError::InvalidContingentRange {
            contingent: graph.node(target).name().to_owned(),
            lower,
            upper,
        });
    }
    Ok(Some(StnuLink {
        activation: source,
        contingent: target,
        lower,
        upper,
    }))
}

fn set_case_values(graph: &mut StnuGraph, link: &StnuLink) -> Result<(), StructuralError> {
    let StnuLink {
        activation,
        contingent,
        lower,
        upper,
    } = *link;
    if let Some(first) = graph.activation_node(contingent).filter(|&first| first != activation) {
        return Err(StructuralError::MultipleActivations {
            contingent: graph.node(contingent).name().to_owned(),
            first: graph.node(first).name().to_owned(),
            second: graph.node(activation).name().to_owned(),
        });
    }

    let lower_case = CaseValue {
        kind: CaseKind::Lower,
        contingent,
        value: lower,
    };
    let upper_case = CaseValue {
        kind: CaseKind::Upper,
        contingent,
        value: -upper,
    };
    for (source, target, case) in [
        (activation, contingent, lower_case),
        (contingent, activation, upper_case),
    ] {
        let edge = graph.edge_or_insert(source, target, || StnuEdge::new(ConstraintKind::Internal));
        if graph
            .edge(edge)
            .case_value()
            .is_some_and(|present| present != case)
        {
            return Err(StructuralError::ContradictoryCaseValues {
                edge: graph.edge_name(edge).to_owned(),
            });
        }
        graph.edge_mut(edge).set_case_value(Some(case));
    }

    graph.node_mut(contingent).set_contingent(true);
    graph.set_activation_node(contingent, activation);
    debug!(
        "contingent link ({}, {lower}, {upper}, {})",
        graph.node(activation).name(),
        graph.node(contingent).name()
    );
    Ok(())
}
