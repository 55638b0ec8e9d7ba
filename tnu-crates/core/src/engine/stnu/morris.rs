//! Morris' cubic algorithm: the network is brought into normal form, then every node with a
//! negative incoming edge propagates that edge backwards.
use log::debug;

use super::tighten;
use super::weight;
use super::Interruption;
use super::StnuLink;
use super::StnuResult;
use crate::basic_types::StnuStatistics;
use crate::containers::KeyedVec;
use crate::containers::MinPriorityQueue;
use crate::engine::termination::TerminationCondition;
use crate::graph::CaseKind;
use crate::graph::CaseValue;
use crate::graph::ConstraintKind;
use crate::graph::Node;
use crate::graph::NodeId;
use crate::graph::StnuEdge;
use crate::graph::StnuGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeStatus {
    Unvisited,
    InProgress,
    Done,
}

pub(crate) fn morris_2014(
    graph: &mut StnuGraph,
    links: &mut [StnuLink],
    statistics: &mut StnuStatistics,
    termination: &mut impl TerminationCondition,
) -> StnuResult<()> {
    to_normal_form(graph, links, statistics);

    let negative_targets = graph
        .nodes()
        .filter(|&node| has_negative_incoming_edge(graph, node))
        .collect::<Vec<_>>();
    let mut statuses: KeyedVec<NodeId, NodeStatus> = KeyedVec::default();
    statuses.resize(graph.node_count(), NodeStatus::Unvisited);

    let mut morris = Morris {
        graph,
        statuses,
        statistics,
        termination,
    };
    for source in negative_targets {
        morris.dc_backprop(source)?;
    }
    Ok(())
}

/// Replaces every link `(A, x, y, C)` with `x > 0` by the link `(A', 0, y - x, C)`, where `A'`
/// is a new node which occurs exactly `x` after `A`.
fn to_normal_form(graph: &mut StnuGraph, links: &mut [StnuLink], statistics: &mut StnuStatistics) {
    for link in links.iter_mut().filter(|link| link.lower > 0) {
        let StnuLink {
            activation,
            contingent,
            lower,
            upper,
        } = *link;
        let name = fresh_name(graph, graph.node(activation).name());
        let Some(shifted) = graph.add_node(Node::new(name)) else {
            unreachable!("the name of the node is fresh")
        };
        statistics.normal_form_nodes += 1;

        let _ = tighten(graph, activation, shifted, lower);
        let _ = tighten(graph, shifted, activation, -lower);
        for edge in [
            graph.find_edge(activation, contingent),
            graph.find_edge(contingent, activation),
        ]
        .into_iter()
        .flatten()
        {
            graph.edge_mut(edge).set_case_value(None);
        }

        let interval = upper - lower;
        let to_contingent = graph.edge_or_insert(shifted, contingent, || {
            StnuEdge::new(ConstraintKind::Internal)
        });
        let data = graph.edge_mut(to_contingent);
        let _ = data.update_value(interval);
        data.set_case_value(Some(CaseValue {
            kind: CaseKind::Lower,
            contingent,
            value: 0,
        }));
        let from_contingent = graph.edge_or_insert(contingent, shifted, || {
            StnuEdge::new(ConstraintKind::Internal)
        });
        let data = graph.edge_mut(from_contingent);
        let _ = data.update_value(0);
        data.set_case_value(Some(CaseValue {
            kind: CaseKind::Upper,
            contingent,
            value: -interval,
        }));

        graph.set_activation_node(contingent, shifted);
        *link = StnuLink {
            activation: shifted,
            contingent,
            lower: 0,
            upper: interval,
        };
        debug!(
            "normal form: {} occurs {lower} after {}",
            graph.node(shifted).name(),
            graph.node(activation).name()
        );
    }
}

fn fresh_name(graph: &StnuGraph, base: &str) -> String {
    let mut name = format!("{base}'");
    while graph.find_node(&name).is_some() {
        name.push('\'');
    }
    name
}

/// The negative weight an edge contributes at the start of a back-propagation, with the
/// contingent node of its upper-case value if it has one.
fn negative_starts(edge: &StnuEdge) -> impl Iterator<Item = (i32, Option<NodeId>)> {
    let ordinary = edge.value().filter(|&value| value < 0).map(|value| (value, None));
    let upper_case = edge
        .upper_case_value()
        .filter(|case| case.value < 0)
        .map(|case| (case.value, Some(case.contingent)));
    ordinary.into_iter().chain(upper_case)
}

fn has_negative_incoming_edge(graph: &StnuGraph, node: NodeId) -> bool {
    graph
        .in_edges(node)
        .any(|(_, edge)| negative_starts(graph.edge(edge)).next().is_some())
}

struct Morris<'a, T> {
    graph: &'a mut StnuGraph,
    statuses: KeyedVec<NodeId, NodeStatus>,
    statistics: &'a mut StnuStatistics,
    termination: &'a mut T,
}

impl<T: TerminationCondition> Morris<'_, T> {
    /// Propagates the negative edges into `source` backwards along non-negative edges, adding an
    /// ordinary edge to `source` from every node reached at a non-negative distance.
    fn dc_backprop(&mut self, source: NodeId) -> StnuResult<()> {
        match self.statuses[source] {
            NodeStatus::Done => return Ok(()),
            NodeStatus::InProgress => {
                debug!(
                    "the back-propagation of {} depends on itself",
                    self.graph.node(source).name()
                );
                return Err(Interruption::NotControllable);
            }
            NodeStatus::Unvisited => {}
        }
        if self.termination.should_stop() {
            return Err(Interruption::Timeout);
        }
        self.statuses[source] = NodeStatus::InProgress;
        self.statistics.back_propagations += 1;

        let node_count = self.graph.node_count();
        let mut queue: MinPriorityQueue<NodeId, i64> = MinPriorityQueue::default();
        let mut origins: KeyedVec<NodeId, Option<NodeId>> = KeyedVec::default();
        origins.resize(node_count, None);
        let mut settled: KeyedVec<NodeId, bool> = KeyedVec::default();
        settled.resize(node_count, false);

        for (predecessor, edge) in self.graph.in_edges(source) {
            for (value, origin) in negative_starts(self.graph.edge(edge)) {
                if queue.insert_or_decrease(predecessor, i64::from(value)) {
                    origins[predecessor] = origin;
                }
            }
        }

        while let Some((node, distance)) = queue.pop_min() {
            settled[node] = true;
            if distance >= 0 {
                if node != source && tighten(self.graph, node, source, weight(distance)?) {
                    self.statistics.derived_edges += 1;
                }
                continue;
            }
            if node == source {
                debug!(
                    "negative cycle through {}",
                    self.graph.node(source).name()
                );
                return Err(Interruption::NotControllable);
            }
            if has_negative_incoming_edge(self.graph, node) {
                self.dc_backprop(node)?;
            }

            let origin = origins[node];
            let predecessors = self.graph.in_edges(node).collect::<Vec<_>>();
            for (predecessor, edge) in predecessors {
                if settled[predecessor] {
                    continue;
                }
                let data = self.graph.edge(edge);
                let ordinary = data.value().filter(|&value| value >= 0);
                // A lower-case edge cannot extend a path which starts with the upper-case edge
                // of the same link.
                let lower_case = data
                    .lower_case_value()
                    .filter(|case| case.value >= 0 && Some(case.contingent) != origin)
                    .map(|case| case.value);
                let Some(edge_weight) = [ordinary, lower_case].into_iter().flatten().min() else {
                    continue;
                };
                if queue.insert_or_decrease(predecessor, distance + i64::from(edge_weight)) {
                    origins[predecessor] = origin;
                }
            }
        }

        self.statuses[source] = NodeStatus::Done;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::CheckStatus;
    use crate::engine::stnu::initialisation::initialise_stnu;
    use crate::engine::stnu::tests::controllable;
    use crate::engine::stnu::tests::not_controllable;
    use crate::engine::termination::Indefinite;

    fn run(mut graph: StnuGraph) -> (StnuResult<()>, StnuGraph, Vec<StnuLink>) {
        let mut status = CheckStatus::default();
        let mut links = initialise_stnu(&mut graph, &mut status).unwrap();
        let result = morris_2014(
            &mut graph,
            &mut links,
            &mut status.stnu,
            &mut Indefinite,
        );
        (result, graph, links)
    }

    #[test]
    fn the_normal_form_shifts_the_activation_node() {
        let (result, graph, links) = run(controllable());

        assert_eq!(Ok(()), result);
        let shifted = graph.find_node("A'").unwrap();
        let a = graph.find_node("A").unwrap();
        let c = graph.find_node("C").unwrap();
        assert_eq!(
            vec![StnuLink {
                activation: shifted,
                contingent: c,
                lower: 0,
                upper: 2
            }],
            links
        );
        assert_eq!(Some(shifted), graph.activation_node(c));
        let edge = graph.find_edge(shifted, a).unwrap();
        assert_eq!(Some(-1), graph.edge(edge).value());
        let edge = graph.find_edge(a, c).unwrap();
        assert_eq!(None, graph.edge(edge).case_value());
    }

    #[test]
    fn a_deadline_before_the_maximum_duration_is_not_controllable() {
        let (result, _, _) = run(not_controllable());

        assert_eq!(Err(Interruption::NotControllable), result);
    }

    fn unvisited(graph: &StnuGraph) -> KeyedVec<NodeId, NodeStatus> {
        let mut statuses = KeyedVec::default();
        statuses.resize(graph.node_count(), NodeStatus::Unvisited);
        statuses
    }

    #[test]
    fn a_back_propagation_first_finishes_the_nodes_it_depends_on() {
        // `Y` is at least 2 before `X` and `W` at least 1 before `Y`; `W` is at most 4 after `Z`.
        let mut graph = StnuGraph::new();
        let ids = ["Z", "X", "Y", "W"]
            .map(|name| graph.add_node(Node::new(name)).unwrap());
        let [z, x, y, w] = ids;
        let _ = graph.add_edge("YX", StnuEdge::ordinary(-2), "Y", "X");
        let _ = graph.add_edge("WY", StnuEdge::ordinary(-1), "W", "Y");
        let _ = graph.add_edge("ZW", StnuEdge::ordinary(4), "Z", "W");
        let mut statistics = StnuStatistics::default();
        let mut termination = Indefinite;
        let mut morris = Morris {
            statuses: unvisited(&graph),
            graph: &mut graph,
            statistics: &mut statistics,
            termination: &mut termination,
        };

        assert_eq!(Ok(()), morris.dc_backprop(x));

        assert_eq!(NodeStatus::Done, morris.statuses[x]);
        assert_eq!(NodeStatus::Done, morris.statuses[y]);
        assert_eq!(NodeStatus::Unvisited, morris.statuses[w]);
        assert_eq!(NodeStatus::Unvisited, morris.statuses[z]);
        assert_eq!(Ok(()), morris.dc_backprop(x));
        assert_eq!(2, statistics.back_propagations);
        assert_eq!(Some(3), graph.edge(graph.find_edge(z, y).unwrap()).value());
        assert_eq!(Some(1), graph.edge(graph.find_edge(z, x).unwrap()).value());
    }

    #[test]
    fn a_back_propagation_which_reaches_itself_is_not_controllable() {
        let mut graph = StnuGraph::new();
        let x = graph.add_node(Node::new("X")).unwrap();
        let y = graph.add_node(Node::new("Y")).unwrap();
        let _ = graph.add_edge("XY", StnuEdge::ordinary(-1), "X", "Y");
        let _ = graph.add_edge("YX", StnuEdge::ordinary(-1), "Y", "X");
        let mut statistics = StnuStatistics::default();
        let mut termination = Indefinite;
        let mut morris = Morris {
            statuses: unvisited(&graph),
            graph: &mut graph,
            statistics: &mut statistics,
            termination: &mut termination,
        };

        assert_eq!(Err(Interruption::NotControllable), morris.dc_backprop(x));

        assert_eq!(NodeStatus::InProgress, morris.statuses[x]);
        assert_eq!(NodeStatus::InProgress, morris.statuses[y]);
        assert_eq!(2, statistics.back_propagations);
    }

    #[test]
    fn a_fresh_name_does_not_clash() {
        let mut graph = StnuGraph::new();
        let _ = graph.add_node(Node::new("A"));
        let _ = graph.add_node(Node::new("A'"));

        assert_eq!("A''", fresh_name(&graph, "A"));
    }
}
