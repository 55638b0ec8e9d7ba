//! The RUL algorithms: one back-propagation per contingent link over the reduced weights of
//! the LO-graph.
use log::debug;

use super::potential::bellman_ford_ol;
use super::potential::forward_propagation_not_dc;
use super::tighten;
use super::weight;
use super::Interruption;
use super::StnuLink;
use super::StnuResult;
use crate::basic_types::StnuStatistics;
use crate::containers::KeyedVec;
use crate::containers::MinPriorityQueue;
use crate::engine::termination::TerminationCondition;
use crate::graph::NodeId;
use crate::graph::StnuGraph;
use crate::tnu_asserts::tnu_assert_eq_simple;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkStatus {
    Unstarted,
    Started,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BackPropagation {
    /// The weights of the edges to add from each node to the activation node.
    Completed(Vec<(NodeId, i32)>),
    /// The link with this index has to be processed first.
    Interrupted(usize),
}

/// Runs RUL-2020 if `incremental`, RUL-2018 otherwise; the nodes must hold a potential of the
/// LO-graph.
pub(crate) fn rul(
    graph: &mut StnuGraph,
    links: &[StnuLink],
    incremental: bool,
    statistics: &mut StnuStatistics,
    termination: &mut impl TerminationCondition,
) -> StnuResult<()> {
    let mut rul = Rul {
        graph,
        links,
        statuses: vec![LinkStatus::Unstarted; links.len()],
        statistics,
        termination,
    };
    for index in 0..links.len() {
        if rul.statuses[index] != LinkStatus::Unstarted {
            continue;
        }
        if incremental {
            rul.process_with_stack(index)?;
        } else {
            rul.process_recursively(index)?;
        }
    }
    Ok(())
}

struct Rul<'a, T> {
    graph: &'a mut StnuGraph,
    links: &'a [StnuLink],
    statuses: Vec<LinkStatus>,
    statistics: &'a mut StnuStatistics,
    termination: &'a mut T,
}

impl<T: TerminationCondition> Rul<'_, T> {
    /// RUL-2020: links interrupted by another link wait on an explicit stack, and the potential is
    /// repaired incrementally.
    fn process_with_stack(&mut self, first: usize) -> StnuResult<()> {
        self.statuses[first] = LinkStatus::Started;
        let mut stack = vec![first];

        while let Some(&current) = stack.last() {
            if self.termination.should_stop() {
                return Err(Interruption::Timeout);
            }
            match self.back_propagate(current)? {
                BackPropagation::Interrupted(next) => {
                    tnu_assert_eq_simple!(self.statuses[next], LinkStatus::Unstarted);
                    self.statuses[next] = LinkStatus::Started;
                    self.statistics.restarted_back_propagations += 1;
                    stack.push(next);
                }
                BackPropagation::Completed(edges) => {
                    let activation = self.links[current].activation;
                    let tightened = self.add_edges(activation, &edges);
                    forward_propagation_not_dc(self.graph, activation, &tightened, self.statistics)?;
                    self.statuses[current] = LinkStatus::Finished;
                    let _ = stack.pop();
                }
            }
        }
        Ok(())
    }

    /// RUL-2018: links interrupted by another link wait for a recursive call, and the potential
    /// is recomputed from scratch after each link.
    fn process_recursively(&mut self, index: usize) -> StnuResult<()> {
        self.statuses[index] = LinkStatus::Started;
        loop {
            if self.termination.should_stop() {
                return Err(Interruption::Timeout);
            }
            match self.back_propagate(index)? {
                BackPropagation::Interrupted(next) => {
                    tnu_assert_eq_simple!(self.statuses[next], LinkStatus::Unstarted);
                    self.statistics.restarted_back_propagations += 1;
                    self.process_recursively(next)?;
                }
                BackPropagation::Completed(edges) => {
                    let activation = self.links[index].activation;
                    let tightened = self.add_edges(activation, &edges);
                    if !tightened.is_empty() {
                        bellman_ford_ol(self.graph, self.statistics)?;
                    }
                    self.statuses[index] = LinkStatus::Finished;
                    return Ok(());
                }
            }
        }
    }

    /// Adds the ordinary edges `node → activation`; returns the nodes whose edge was tightened.
    fn add_edges(&mut self, activation: NodeId, edges: &[(NodeId, i32)]) -> Vec<NodeId> {
        let tightened = edges
            .iter()
            .filter(|&&(node, value)| tighten(self.graph, node, activation, value))
            .map(|&(node, _)| node)
            .collect::<Vec<_>>();
        self.statistics.derived_edges += tightened.len() as u64;
        tightened
    }

    fn link_activated_by(&self, node: NodeId, current: usize) -> Option<usize> {
        self.links
            .iter()
            .enumerate()
            .find(|&(index, link)| {
                index != current
                    && link.activation == node
                    && self.statuses[index] != LinkStatus::Finished
            })
            .map(|(index, _)| index)
    }

    /// Dijkstra backwards from the contingent node of link `index`, over reduced weights.
    ///
    /// A node at distance `d` at least the length of the uncertainty interval `y - x` gets the
    /// edge to the activation node of weight `d - y` and is not expanded further; closer nodes
    /// are expanded, using lower-case edges only from negative distances.
    fn back_propagate(&mut self, index: usize) -> StnuResult<BackPropagation> {
        self.statistics.back_propagations += 1;
        let StnuLink {
            activation,
            contingent,
            lower,
            upper,
        } = self.links[index];
        let interval = i64::from(upper) - i64::from(lower);
        let upper = i64::from(upper);
        let graph = &*self.graph;
        let potential = |node: NodeId| graph.node(node).potential();

        let mut queue: MinPriorityQueue<NodeId, i64> = MinPriorityQueue::default();
        let mut settled: KeyedVec<NodeId, bool> = KeyedVec::default();
        settled.resize(graph.node_count(), false);
        let mut edges = Vec::new();
        let _ = queue.insert_or_decrease(contingent, 0);

        while let Some((node, key)) = queue.pop_min() {
            settled[node] = true;
            let distance = key - potential(node) + potential(contingent);

            if node == activation {
                if distance < upper {
                    debug!(
                        "{} reaches its own activation node at distance {distance}",
                        graph.node(contingent).name()
                    );
                    return Err(Interruption::NotControllable);
                }
                continue;
            }
            if node != contingent && distance >= interval {
                edges.push((node, weight(distance - upper)?));
                continue;
            }
            if node != contingent {
                if let Some(other) = self.link_activated_by(node, index) {
                    if self.statuses[other] == LinkStatus::Started {
                        debug!("the links of {} depend on each other", graph.node(node).name());
                        return Err(Interruption::NotControllable);
                    }
                    return Ok(BackPropagation::Interrupted(other));
                }
            }

            for (predecessor, edge) in graph.in_edges(node) {
                if settled[predecessor] {
                    continue;
                }
                let data = graph.edge(edge);
                let lower_case = data
                    .lower_case_value()
                    .filter(|_| distance < 0)
                    .map(|case| case.value);
                let Some(edge_weight) = [data.value(), lower_case].into_iter().flatten().min() else {
                    continue;
                };
                let predecessor_distance = distance + i64::from(edge_weight);
                if predecessor == contingent {
                    if predecessor_distance < 0 {
                        return Err(Interruption::NotControllable);
                    }
                    continue;
                }
                let _ = queue.insert_or_decrease(
                    predecessor,
                    predecessor_distance + potential(predecessor) - potential(contingent),
                );
            }
        }

        Ok(BackPropagation::Completed(edges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::stnu::initialisation::initialise_stnu;
    use crate::engine::stnu::tests::controllable;
    use crate::engine::stnu::tests::network_with_link;
    use crate::engine::stnu::tests::not_controllable;
    use crate::basic_types::CheckStatus;
    use crate::engine::termination::Indefinite;
    use crate::graph::Node;
    use crate::graph::StnuEdge;

    fn run(mut graph: StnuGraph, incremental: bool) -> (StnuResult<()>, StnuGraph, StnuStatistics) {
        let mut status = CheckStatus::default();
        let links = initialise_stnu(&mut graph, &mut status).unwrap();
        let mut statistics = StnuStatistics::default();
        let result = bellman_ford_ol(&mut graph, &mut statistics)
            .and_then(|()| rul(&mut graph, &links, incremental, &mut statistics, &mut Indefinite));
        (result, graph, statistics)
    }

    #[test]
    fn a_deadline_before_the_maximum_duration_is_not_controllable() {
        for incremental in [false, true] {
            let (result, _, _) = run(not_controllable(), incremental);
            assert_eq!(Err(Interruption::NotControllable), result);
        }
    }

    #[test]
    fn waiting_for_the_contingent_node_is_controllable() {
        for incremental in [false, true] {
            let (result, _, _) = run(controllable(), incremental);
            assert_eq!(Ok(()), result);
        }
    }

    #[test]
    fn a_wait_is_derived() {
        // X may occur at most 2 before C, which happens between 1 and 3 after A.
        let mut graph = network_with_link();
        let _ = graph.add_node(Node::new("X"));
        let _ = graph.add_edge("XC", StnuEdge::ordinary(2), "X", "C");

        for incremental in [false, true] {
            let (result, graph, statistics) = run(graph.clone(), incremental);

            assert_eq!(Ok(()), result);
            let x = graph.find_node("X").unwrap();
            let a = graph.find_node("A").unwrap();
            let edge = graph.find_edge(x, a).unwrap();
            assert_eq!(Some(-1), graph.edge(edge).value());
            assert!(statistics.derived_edges > 0);
        }
    }

    /// The activation node `B` of the link `(B, 2, 4, D)` has to occur at least 1 after the
    /// contingent node `C` of the link `(A, 1, 3, C)`, which comes first.
    fn chained_links() -> StnuGraph {
        let mut graph = network_with_link();
        let _ = graph.add_node(Node::new("B"));
        let _ = graph.add_node(Node::new("D"));
        let _ = graph.add_edge("BD", StnuEdge::contingent(4), "B", "D");
        let _ = graph.add_edge("DB", StnuEdge::contingent(-2), "D", "B");
        let _ = graph.add_edge("BC", StnuEdge::ordinary(-1), "B", "C");
        graph
    }

    #[test]
    fn links_depending_on_each_other_are_processed_in_order() {
        for incremental in [false, true] {
            let (result, _, statistics) = run(chained_links(), incremental);

            assert_eq!(Ok(()), result);
            // C reaches B, so the link of D is processed before the link of C is started again.
            assert_eq!(1, statistics.restarted_back_propagations);
            assert_eq!(3, statistics.back_propagations);
        }
    }

    #[test]
    fn an_interrupted_link_waits_on_the_stack() {
        let mut graph = chained_links();
        let mut status = CheckStatus::default();
        let links = initialise_stnu(&mut graph, &mut status).unwrap();
        let mut statistics = StnuStatistics::default();
        bellman_ford_ol(&mut graph, &mut statistics).unwrap();
        let mut termination = Indefinite;
        let mut rul = Rul {
            graph: &mut graph,
            links: &links,
            statuses: vec![LinkStatus::Unstarted; links.len()],
            statistics: &mut statistics,
            termination: &mut termination,
        };

        assert_eq!(Ok(BackPropagation::Interrupted(1)), rul.back_propagate(0));

        rul.process_with_stack(0).unwrap();
        assert_eq!(vec![LinkStatus::Finished; 2], rul.statuses);
    }

    #[test]
    fn a_started_link_which_is_reached_again_is_not_controllable() {
        let mut graph = chained_links();
        let mut status = CheckStatus::default();
        let links = initialise_stnu(&mut graph, &mut status).unwrap();
        let mut statistics = StnuStatistics::default();
        bellman_ford_ol(&mut graph, &mut statistics).unwrap();
        let mut termination = Indefinite;
        let mut rul = Rul {
            graph: &mut graph,
            links: &links,
            statuses: vec![LinkStatus::Unstarted, LinkStatus::Started],
            statistics: &mut statistics,
            termination: &mut termination,
        };

        assert_eq!(Err(Interruption::NotControllable), rul.back_propagate(0));
    }
}
