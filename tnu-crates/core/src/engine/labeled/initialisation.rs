//! The well-definedness checks and fixes applied to a conditional network before propagation.
use log::debug;
use log::warn;

use crate::basic_types::ArithmeticRangeError;
use crate::basic_types::CheckStatus;
use crate::basic_types::StructuralError;
use crate::containers::HashMap;
use crate::graph::ConstraintKind;
use crate::graph::EdgeData;
use crate::graph::EdgeId;
use crate::graph::LabeledEdge;
use crate::graph::LabeledGraph;
use crate::graph::Node;
use crate::graph::NodeId;
use crate::labels::CaseLabel;
use crate::labels::Label;
use crate::labels::Proposition;
use crate::math::extended_int::is_finite;
use crate::math::extended_int::ExtendedInt;

/// The bound every node is given with respect to Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Horizon {
    /// The largest absolute value of a negative finite value of the network.
    pub(crate) max_weight: i64,
    pub(crate) value: i32,
}

pub(crate) fn record_fix(status: &mut CheckStatus, fix: String) {
    warn!("{fix}");
    status.fixes.push(fix);
}

/// Checks the network, fixing what can be fixed; returns the node Z.
pub(crate) fn check_well_definedness(
    graph: &mut LabeledGraph,
    with_node_labels: bool,
    status: &mut CheckStatus,
) -> Result<NodeId, StructuralError> {
    let z = ensure_z(graph, status);
    check_unique_observers(graph)?;
    if with_node_labels {
        close_node_labels(graph, status)?;
        check_observer_labels(graph)?;
    }
    for edge in graph.edges().collect::<Vec<_>>() {
        fix_edge_labels(graph, edge, with_node_labels, status)?;
    }
    Ok(z)
}

pub(crate) fn reject_contingent_edges(graph: &LabeledGraph) -> Result<(), StructuralError> {
    match graph.contingent_edges().first() {
        Some(&edge) => Err(StructuralError::UnsupportedContingentEdge {
            edge: graph.edge_name(edge).to_owned(),
        }),
        None => Ok(()),
    }
}

fn ensure_z(graph: &mut LabeledGraph, status: &mut CheckStatus) -> NodeId {
    let z = match graph.z().or_else(|| graph.find_node("Z")) {
        Some(z) => z,
        None => {
            record_fix(status, "added the missing node Z".to_owned());
            graph
                .add_node(Node::new("Z"))
                .unwrap_or_else(|| unreachable!("no node is called Z"))
        }
    };
    graph.set_z(z);

    let label = graph.node(z).label();
    if !label.is_empty() {
        record_fix(status, format!("removed the label {label} of Z"));
        graph.node_mut(z).set_label(Label::EMPTY);
    }
    z
}

fn check_unique_observers(graph: &LabeledGraph) -> Result<(), StructuralError> {
    let mut observers: HashMap<Proposition, NodeId> = HashMap::default();
    for node in graph.nodes() {
        let Some(proposition) = graph.node(node).observed() else {
            continue;
        };
        if let Some(&first) = observers.get(&proposition) {
            return Err(StructuralError::DuplicateObserver {
                proposition,
                first: graph.node(first).name().to_owned(),
                second: graph.node(node).name().to_owned(),
            });
        }
        let _ = observers.insert(proposition, node);
    }
    Ok(())
}

fn check_observer_labels(graph: &LabeledGraph) -> Result<(), StructuralError> {
    for node in graph.nodes().map(|node| graph.node(node)) {
        if let Some(proposition) = node.observed() {
            if node.label().contains_proposition(proposition) {
                return Err(StructuralError::ObserverLabelContainsOwnProposition {
                    node: node.name().to_owned(),
                    proposition,
                });
            }
        }
    }
    Ok(())
}

/// The conjunction of `label` with the labels of the observers of its propositions, repeated
/// until nothing changes.
///
/// `Err` holds a proposition without observer; `Ok(None)` means the conjunction is inconsistent.
fn close_label(graph: &LabeledGraph, label: Label) -> Result<Option<Label>, Proposition> {
    let mut closed = label;
    loop {
        let mut next = closed;
        for proposition in closed.propositions().iter() {
            let observer = graph.observer(proposition).ok_or(proposition)?;
            match next.conjunction(graph.node(observer).label()) {
                Some(conjunction) => next = conjunction,
                None => return Ok(None),
            }
        }
        if next == closed {
            return Ok(Some(closed));
        }
        closed = next;
    }
}

fn close_node_labels(graph: &mut LabeledGraph, status: &mut CheckStatus) -> Result<(), StructuralError> {
    for node in graph.nodes().collect::<Vec<_>>() {
        let label = graph.node(node).label();
        let closed = close_label(graph, label)
            .map_err(|proposition| StructuralError::UnobservedProposition {
                element: graph.node(node).name().to_owned(),
                proposition,
            })?
            .ok_or_else(|| StructuralError::InconsistentNodeLabel {
                node: graph.node(node).name().to_owned(),
            })?;
        if closed != label {
            record_fix(
                status,
                format!(
                    "extended the label of {} from {label} to {closed}",
                    graph.node(node).name()
                ),
            );
            graph.node_mut(node).set_label(closed);
        }
    }
    Ok(())
}

fn fix_edge_labels(
    graph: &mut LabeledGraph,
    edge: EdgeId,
    with_node_labels: bool,
    status: &mut CheckStatus,
) -> Result<(), StructuralError> {
    let (source, target) = graph.endpoints(edge);
    for (case_label, label, value) in graph.edge(edge).values_with_case() {
        if label.contains_unknown() {
            remove_value(graph.edge_mut(edge), case_label, label);
            record_fix(
                status,
                format!(
                    "removed ({label}, {}) from {}: unknown literals are not allowed",
                    ExtendedInt(value),
                    graph.edge_name(edge)
                ),
            );
            continue;
        }

        let unobserved = |proposition| StructuralError::UnobservedProposition {
            element: graph.edge_name(edge).to_owned(),
            proposition,
        };
        if !with_node_labels {
            if let Some(proposition) = label
                .propositions()
                .iter()
                .find(|&proposition| graph.observer(proposition).is_none())
            {
                return Err(unobserved(proposition));
            }
            continue;
        }

        let required = label
            .conjunction(graph.node(source).label())
            .and_then(|required| required.conjunction(graph.node(target).label()));
        let required = match required {
            Some(required) => close_label(graph, required).map_err(unobserved)?,
            None => None,
        };
        if required == Some(label) {
            continue;
        }

        let name = graph.edge_name(edge).to_owned();
        let data = graph.edge_mut(edge);
        remove_value(data, case_label, label);
        match required {
            Some(required) => {
                let _ = data.merge_upper_case_value(case_label, required, value);
                record_fix(
                    status,
                    format!("replaced label {label} of {name} by {required}"),
                );
            }
            None => record_fix(
                status,
                format!(
                    "removed ({label}, {}) from {name}: it contradicts the node labels",
                    ExtendedInt(value)
                ),
            ),
        }
    }
    Ok(())
}

fn remove_value(edge: &mut LabeledEdge, case_label: CaseLabel, label: Label) {
    let _ = if case_label.is_empty() {
        edge.remove_labeled_value(label)
    } else {
        edge.remove_upper_case_value(case_label, label)
    };
}

pub(crate) fn compute_horizon(graph: &LabeledGraph) -> Result<Horizon, ArithmeticRangeError> {
    let max_weight = graph
        .edges()
        .flat_map(|edge| graph.edge(edge).values_with_case())
        .map(|(_, _, value)| value)
        .filter(|&value| value < 0 && is_finite(value))
        .map(|value| -i64::from(value))
        .max()
        .unwrap_or(0);
    let node_count = graph.node_count();

    let value = i64::try_from(node_count)
        .ok()
        .and_then(|count| max_weight.checked_mul(count))
        .and_then(|horizon| i32::try_from(horizon).ok())
        .filter(|&horizon| is_finite(horizon))
        .ok_or(ArithmeticRangeError::HorizonOverflow {
            max_weight,
            node_count,
        })?;

    Ok(Horizon { max_weight, value })
}

/// Bounds every node other than Z to `[0, horizon]` after Z, in the scenarios of its label.
pub(crate) fn add_bounds_to_z(graph: &mut LabeledGraph, z: NodeId, horizon: i32, with_node_labels: bool) {
    for node in graph.nodes().filter(|&node| node != z).collect::<Vec<_>>() {
        let label = if with_node_labels {
            graph.node(node).label()
        } else {
            Label::EMPTY
        };
        let to_z = graph.edge_or_insert(node, z, || LabeledEdge::new(ConstraintKind::Internal));
        let _ = graph.edge_values_mut(to_z).merge_labeled_value(label, 0);
        let from_z = graph.edge_or_insert(z, node, || LabeledEdge::new(ConstraintKind::Internal));
        let _ = graph.edge_values_mut(from_z).merge_labeled_value(label, horizon);
    }
    debug!("bounded {} nodes by the horizon {horizon}", graph.node_count() - 1);
}

/// The number of passes after which propagation gives up.
pub(crate) fn cycle_bound(max_weight: i64, node_count: usize, proposition_count: usize) -> u64 {
    let weight = u64::try_from(max_weight.max(1)).unwrap_or(u64::MAX);
    let nodes = node_count as u64;
    let propositions = proposition_count.max(1) as u64;
    weight
        .saturating_mul(nodes.saturating_mul(nodes))
        .saturating_mul(propositions.saturating_pow(3))
}

/// A copy of `graph` without unknown literals, self-loops and checker-added edges without values.
pub(crate) fn cleaned(graph: &LabeledGraph) -> LabeledGraph {
    let mut cleaned = graph.clone();
    for edge in cleaned.edges().collect::<Vec<_>>() {
        let (source, target) = cleaned.endpoints(edge);
        let _ = cleaned.edge_values_mut(edge).remove_unknown_labels();
        let data = cleaned.edge(edge);
        let added = matches!(data.kind(), ConstraintKind::Derived | ConstraintKind::Internal);
        if source == target || (added && data.is_empty()) {
            let _ = cleaned.remove_edge(edge);
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> Label {
        s.parse().unwrap()
    }

    fn proposition(c: char) -> Proposition {
        Proposition::from_char(c).unwrap()
    }

    #[test]
    fn a_missing_z_is_added() {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("A"));
        let mut status = CheckStatus::default();

        let z = check_well_definedness(&mut graph, true, &mut status).unwrap();

        assert_eq!("Z", graph.node(z).name());
        assert_eq!(1, status.fixes.len());
    }

    #[test]
    fn duplicate_observers_are_rejected() {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("Z"));
        let _ = graph.add_node(Node::new("P1?").observing(proposition('p')));
        let _ = graph.add_node(Node::new("P2?").observing(proposition('p')));
        let mut status = CheckStatus::default();

        let result = check_well_definedness(&mut graph, true, &mut status);

        assert_eq!(
            Err(StructuralError::DuplicateObserver {
                proposition: proposition('p'),
                first: "P1?".to_owned(),
                second: "P2?".to_owned(),
            }),
            result
        );
    }

    #[test]
    fn node_labels_inherit_the_labels_of_observers() {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("Z"));
        let _ = graph.add_node(Node::new("P?").observing(proposition('p')));
        let _ = graph.add_node(
            Node::new("Q?")
                .observing(proposition('q'))
                .with_label(label("p")),
        );
        let x = graph
            .add_node(Node::new("X").with_label(label("q")))
            .unwrap();
        let mut status = CheckStatus::default();

        let _ = check_well_definedness(&mut graph, true, &mut status).unwrap();

        assert_eq!(label("pq"), graph.node(x).label());
        assert_eq!(1, status.fixes.len());
    }

    #[test]
    fn an_observer_may_not_depend_on_its_own_proposition() {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("Z"));
        let _ = graph.add_node(
            Node::new("P?")
                .observing(proposition('p'))
                .with_label(label("q")),
        );
        let _ = graph.add_node(
            Node::new("Q?")
                .observing(proposition('q'))
                .with_label(label("p")),
        );
        let mut status = CheckStatus::default();

        let result = check_well_definedness(&mut graph, true, &mut status);

        assert!(matches!(
            result,
            Err(StructuralError::ObserverLabelContainsOwnProposition { .. })
        ));
    }

    #[test]
    fn edge_labels_are_extended_with_the_node_labels() {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("Z"));
        let _ = graph.add_node(Node::new("P?").observing(proposition('p')));
        let _ = graph.add_node(Node::new("Q?").observing(proposition('q')));
        let _ = graph.add_node(Node::new("X").with_label(label("p")));
        let edge = graph
            .add_edge("XZ", LabeledEdge::ordinary(label("q"), -3), "X", "Z")
            .unwrap();
        let _ = graph
            .edge_mut(edge)
            .merge_labeled_value(label("¬p"), -1);
        let mut status = CheckStatus::default();

        let _ = check_well_definedness(&mut graph, true, &mut status).unwrap();

        let values = graph.edge(edge).values();
        assert_eq!(Some(-3), values.get(label("pq")));
        assert_eq!(None, values.get(label("¬p")));
        assert_eq!(2, status.fixes.len());
    }

    #[test]
    fn unobserved_propositions_are_rejected() {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("Z"));
        let _ = graph.add_node(Node::new("X"));
        let _ = graph.add_edge("XZ", LabeledEdge::ordinary(label("p"), -3), "X", "Z");
        let mut status = CheckStatus::default();

        let result = check_well_definedness(&mut graph, false, &mut status);

        assert_eq!(
            Err(StructuralError::UnobservedProposition {
                element: "XZ".to_owned(),
                proposition: proposition('p'),
            }),
            result
        );
    }

    #[test]
    fn the_horizon_is_the_largest_negative_weight_times_the_nodes() {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("Z"));
        let _ = graph.add_node(Node::new("X"));
        let _ = graph.add_node(Node::new("Y"));
        let _ = graph.add_edge("XY", LabeledEdge::ordinary(Label::EMPTY, -7), "X", "Y");
        let _ = graph.add_edge("YX", LabeledEdge::ordinary(Label::EMPTY, 20), "Y", "X");

        let horizon = compute_horizon(&graph).unwrap();

        assert_eq!(
            Horizon {
                max_weight: 7,
                value: 21
            },
            horizon
        );
    }

    #[test]
    fn a_horizon_out_of_range_is_an_error() {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("Z"));
        let _ = graph.add_node(Node::new("X"));
        let _ = graph.add_edge("XZ", LabeledEdge::ordinary(Label::EMPTY, i32::MIN + 1), "X", "Z");

        assert!(matches!(
            compute_horizon(&graph),
            Err(ArithmeticRangeError::HorizonOverflow { .. })
        ));
    }

    #[test]
    fn nodes_are_bounded_with_respect_to_z() {
        let mut graph = LabeledGraph::new();
        let z = graph.add_node(Node::new("Z")).unwrap();
        let x = graph.add_node(Node::new("X")).unwrap();

        add_bounds_to_z(&mut graph, z, 15, true);

        let to_z = graph.find_edge(x, z).unwrap();
        let from_z = graph.find_edge(z, x).unwrap();
        assert_eq!(Some(0), graph.edge(to_z).values().get(Label::EMPTY));
        assert_eq!(Some(15), graph.edge(from_z).values().get(Label::EMPTY));
        assert_eq!(ConstraintKind::Internal, graph.edge(to_z).kind());
    }

    #[test]
    fn cleaning_drops_unknown_literals_and_self_loops() {
        let mut graph = LabeledGraph::new();
        let z = graph.add_node(Node::new("Z")).unwrap();
        let x = graph.add_node(Node::new("X")).unwrap();
        let mut derived = LabeledEdge::new(ConstraintKind::Derived);
        let _ = derived.merge_labeled_value(label("¿p"), -2);
        let _ = graph.add_edge_between("XZ", derived, x, z);
        let _ = graph.add_edge_between("XX", LabeledEdge::ordinary(label("¿p"), -1), x, x);
        let _ = graph.add_edge_between("ZX", LabeledEdge::ordinary(Label::EMPTY, 4), z, x);

        let cleaned = cleaned(&graph);

        assert_eq!(1, cleaned.edge_count());
        assert!(cleaned.find_edge(z, x).is_some());
        assert_eq!(3, graph.edge_count());
    }

    #[test]
    fn the_cycle_bound_saturates() {
        assert_eq!(4 * 9, cycle_bound(4, 3, 0));
        assert_eq!(u64::MAX, cycle_bound(i64::MAX, 1 << 20, 32));
    }
}
