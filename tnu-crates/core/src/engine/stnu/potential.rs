//! Potentials of the LO-graph: the graph of the ordinary and lower-case values.
//!
//! A potential `p` satisfies `p(v) <= p(u) + w` for every edge `u → v` of weight `w`, so the
//! reduced weights `w + p(u) - p(v)` are non-negative and Dijkstra can run over them.
use log::debug;

use super::Interruption;
use super::StnuResult;
use crate::basic_types::StnuStatistics;
use crate::containers::KeyedVec;
use crate::containers::MinPriorityQueue;
use crate::graph::NodeId;
use crate::graph::StnuGraph;

/// The weight of `source → target` in the LO-graph, if the edge exists.
pub(crate) fn lo_weight(graph: &StnuGraph, source: NodeId, target: NodeId) -> Option<i64> {
    graph
        .find_edge(source, target)
        .and_then(|edge| graph.edge(edge).lower_or_ordinary_weight())
        .map(i64::from)
}

/// Computes a potential of the LO-graph from a virtual source connected to every node with
/// weight 0 and stores it in the nodes.
///
/// A negative cycle in the LO-graph means the network is not controllable.
pub(crate) fn bellman_ford_ol(graph: &mut StnuGraph, statistics: &mut StnuStatistics) -> StnuResult<()> {
    statistics.bellman_ford_runs += 1;

    let weights = graph
        .edges()
        .filter_map(|edge| {
            let (source, target) = graph.endpoints(edge);
            graph
                .edge(edge)
                .lower_or_ordinary_weight()
                .map(|weight| (source, target, i64::from(weight)))
        })
        .collect::<Vec<_>>();

    let mut distances: KeyedVec<NodeId, i64> = KeyedVec::default();
    distances.resize(graph.node_count(), 0);

    for _ in 0..=graph.node_count() {
        let mut changed = false;
        for &(source, target, weight) in &weights {
            let distance = distances[source] + weight;
            if distance < distances[target] {
                distances[target] = distance;
                changed = true;
            }
        }
        if !changed {
            for node in distances.keys() {
                graph.node_mut(node).set_potential(distances[node]);
            }
            return Ok(());
        }
    }

    debug!("the LO-graph has a negative cycle");
    Err(Interruption::NotControllable)
}

/// Restores the potential after edges into `activation` were tightened.
///
/// Only nodes reachable from `activation` whose shortest path from it, in reduced weights, is
/// shorter than the decrease of the potential of `activation` need a new potential. A tightened
/// edge which still violates the new potential closes a negative cycle.
pub(crate) fn forward_propagation_not_dc(
    graph: &mut StnuGraph,
    activation: NodeId,
    tightened: &[NodeId],
    statistics: &mut StnuStatistics,
) -> StnuResult<()> {
    let potential = |graph: &StnuGraph, node: NodeId| graph.node(node).potential();

    let new_potential = tightened
        .iter()
        .filter_map(|&source| {
            lo_weight(graph, source, activation).map(|weight| potential(graph, source) + weight)
        })
        .fold(potential(graph, activation), i64::min);
    let decrease = potential(graph, activation) - new_potential;
    if decrease <= 0 {
        return Ok(());
    }
    statistics.potential_updates += 1;

    let mut queue: MinPriorityQueue<NodeId, i64> = MinPriorityQueue::default();
    let mut settled: KeyedVec<NodeId, bool> = KeyedVec::default();
    settled.resize(graph.node_count(), false);
    let mut updates = Vec::new();
    let _ = queue.insert_or_decrease(activation, 0);

    while let Some((node, key)) = queue.pop_min() {
        settled[node] = true;
        updates.push((node, potential(graph, node) - (decrease - key)));

        let successors = graph.out_edges(node).collect::<Vec<_>>();
        for (successor, edge) in successors {
            if settled[successor] {
                continue;
            }
            let Some(weight) = graph.edge(edge).lower_or_ordinary_weight() else {
                continue;
            };
            let reduced =
                i64::from(weight) + potential(graph, node) - potential(graph, successor);
            let successor_key = key + reduced;
            if successor_key < decrease {
                let _ = queue.insert_or_decrease(successor, successor_key);
            }
        }
    }

    for (node, value) in updates {
        graph.node_mut(node).set_potential(value);
    }

    let violated = tightened.iter().any(|&source| {
        lo_weight(graph, source, activation)
            .is_some_and(|weight| potential(graph, source) + weight < potential(graph, activation))
    });
    if violated {
        debug!(
            "tightened edges into {} close a negative cycle",
            graph.node(activation).name()
        );
        return Err(Interruption::NotControllable);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::StnuStatistics;
    use crate::graph::Node;
    use crate::graph::StnuEdge;

    fn chain() -> (StnuGraph, Vec<NodeId>) {
        let mut graph = StnuGraph::new();
        let nodes = ["Z", "A", "B"]
            .iter()
            .map(|name| graph.add_node(Node::new(*name)).unwrap())
            .collect::<Vec<_>>();
        let _ = graph.add_edge("AB", StnuEdge::ordinary(-2), "A", "B");
        let _ = graph.add_edge("BZ", StnuEdge::ordinary(-1), "B", "Z");
        (graph, nodes)
    }

    fn assert_potential(graph: &StnuGraph) {
        for edge in graph.edges() {
            let (source, target) = graph.endpoints(edge);
            if let Some(weight) = graph.edge(edge).lower_or_ordinary_weight() {
                assert!(
                    graph.node(target).potential()
                        <= graph.node(source).potential() + i64::from(weight)
                );
            }
        }
    }

    #[test]
    fn bellman_ford_computes_a_potential() {
        let (mut graph, nodes) = chain();
        let mut statistics = StnuStatistics::default();

        bellman_ford_ol(&mut graph, &mut statistics).unwrap();

        assert_potential(&graph);
        assert_eq!(-3, graph.node(nodes[0]).potential());
        assert_eq!(1, statistics.bellman_ford_runs);
    }

    #[test]
    fn bellman_ford_detects_negative_cycles() {
        let (mut graph, _) = chain();
        let _ = graph.add_edge("ZA", StnuEdge::ordinary(2), "Z", "A");
        let mut statistics = StnuStatistics::default();

        assert_eq!(
            Err(Interruption::NotControllable),
            bellman_ford_ol(&mut graph, &mut statistics)
        );
    }

    #[test]
    fn the_potential_is_repaired_incrementally() {
        let (mut graph, nodes) = chain();
        let mut statistics = StnuStatistics::default();
        bellman_ford_ol(&mut graph, &mut statistics).unwrap();

        let d = graph.add_node(Node::new("D")).unwrap();
        graph.node_mut(d).set_potential(0);
        let _ = graph.add_edge_between("DA", StnuEdge::ordinary(-5), d, nodes[1]);
        forward_propagation_not_dc(&mut graph, nodes[1], &[d], &mut statistics).unwrap();

        assert_potential(&graph);
        assert_eq!(-5, graph.node(nodes[1]).potential());
        assert_eq!(-8, graph.node(nodes[0]).potential());
        assert_eq!(1, statistics.potential_updates);
    }

    #[test]
    fn a_tightened_edge_closing_a_negative_cycle_is_detected() {
        let (mut graph, nodes) = chain();
        let mut statistics = StnuStatistics::default();
        bellman_ford_ol(&mut graph, &mut statistics).unwrap();

        let _ = graph.add_edge_between("BA", StnuEdge::ordinary(1), nodes[2], nodes[1]);

        assert_eq!(
            Err(Interruption::NotControllable),
            forward_propagation_not_dc(&mut graph, nodes[1], &[nodes[2]], &mut statistics)
        );
    }
}
