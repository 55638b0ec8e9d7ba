use std::time::Instant;

use log::info;

use super::labeled::add_bounds_to_z;
use super::labeled::check_well_definedness;
use super::labeled::cleaned;
use super::labeled::compute_horizon;
use super::labeled::cycle_bound;
use super::labeled::propagate_to_fixpoint;
use super::labeled::reject_contingent_edges;
use super::labeled::FullRuleSet;
use super::labeled::Horizon;
use super::labeled::RuleContext;
use super::labeled::RuleSet;
use super::termination::TerminationCondition;
use super::CheckerOptions;
use super::CheckerState;
use crate::basic_types::CheckError;
use crate::basic_types::CheckStatus;
use crate::graph::LabeledGraph;
use crate::graph::NodeId;
use crate::labels::Label;
use crate::math::POS_INFINITY;
use crate::tnu_asserts::tnu_assert_simple;

/// Checks the dynamic consistency of a conditional simple temporal network.
///
/// The checker owns the network and adds derived values to it; the graph can be retrieved, as
/// is or cleaned of intermediate values, after the check.
///
/// # Example
/// ```
/// # use tnu_core::graph::LabeledEdge;
/// # use tnu_core::graph::LabeledGraph;
/// # use tnu_core::graph::Node;
/// # use tnu_core::labels::Label;
/// # use tnu_core::CheckOutcome;
/// # use tnu_core::CheckerOptions;
/// # use tnu_core::CstnChecker;
/// let mut graph = LabeledGraph::new();
/// let _ = graph.add_node(Node::new("Z"));
/// let _ = graph.add_node(Node::new("A"));
/// let _ = graph.add_edge("ZA", LabeledEdge::ordinary(Label::EMPTY, 5), "Z", "A");
/// let _ = graph.add_edge("AZ", LabeledEdge::ordinary(Label::EMPTY, -6), "A", "Z");
///
/// let mut checker = CstnChecker::new(graph, CheckerOptions::default());
/// let status = checker.init_and_check().unwrap();
///
/// assert_eq!(CheckOutcome::Inconsistent, status.outcome());
/// ```
#[derive(Debug)]
pub struct CstnChecker<R = FullRuleSet> {
    graph: LabeledGraph,
    options: CheckerOptions,
    rule_set: R,
    state: CheckerState,
    status: CheckStatus,
    z: Option<NodeId>,
    horizon: Option<Horizon>,
}

impl CstnChecker {
    pub fn new(graph: LabeledGraph, options: CheckerOptions) -> Self {
        CstnChecker::with_rule_set(graph, options, FullRuleSet)
    }
}

impl<R: RuleSet> CstnChecker<R> {
    pub fn with_rule_set(graph: LabeledGraph, options: CheckerOptions, rule_set: R) -> Self {
        CstnChecker {
            graph,
            options,
            rule_set,
            state: CheckerState::Uninitialized,
            status: CheckStatus::default(),
            z: None,
            horizon: None,
        }
    }

    pub fn state(&self) -> CheckerState {
        self.state
    }

    /// The status of the last check, or of the initialisation if no check has run yet.
    pub fn status(&self) -> &CheckStatus {
        &self.status
    }

    pub fn graph(&self) -> &LabeledGraph {
        &self.graph
    }

    pub fn into_graph(self) -> LabeledGraph {
        self.graph
    }

    /// A copy of the checked network without values with unknown literals, self-loops and the
    /// edges the checker added which hold no value.
    pub fn graph_cleaned(&self) -> LabeledGraph {
        cleaned(&self.graph)
    }

    /// The horizon bounding every node after Z, known once the checker is initialised.
    pub fn horizon(&self) -> Option<i32> {
        self.horizon.map(|horizon| horizon.value)
    }

    /// The earliest and latest time of `node` after Z which hold whenever `scenario` holds,
    /// according to the values derived so far.
    ///
    /// `None` if the checker is not initialised or no bound of `node` holds in `scenario`.
    pub fn time_window(&self, node: NodeId, scenario: Label) -> Option<(i32, i32)> {
        let z = self.z?;
        let to_z = self.graph.find_edge(node, z)?;
        let from_z = self.graph.find_edge(z, node)?;

        let earliest = self
            .graph
            .edge(to_z)
            .values()
            .min_value_subsumed_by(scenario)?;
        let latest = self
            .graph
            .edge(from_z)
            .values()
            .min_value_subsumed_by(scenario)?;
        Some((earliest.checked_neg().unwrap_or(POS_INFINITY), latest))
    }

    /// Checks and fixes the network, then bounds every node with respect to Z.
    ///
    /// Does nothing if the checker has already been initialised.
    pub fn initialise(&mut self) -> Result<(), CheckError> {
        if self.state != CheckerState::Uninitialized {
            return Ok(());
        }
        let with_node_labels = self.options.with_node_labels;

        let z = check_well_definedness(&mut self.graph, with_node_labels, &mut self.status)?;
        reject_contingent_edges(&self.graph)?;
        let horizon = compute_horizon(&self.graph)?;
        add_bounds_to_z(&mut self.graph, z, horizon.value, with_node_labels);

        info!(
            "initialised a network with {} nodes and {} edges, horizon {}",
            self.graph.node_count(),
            self.graph.edge_count(),
            horizon.value
        );
        self.z = Some(z);
        self.horizon = Some(horizon);
        self.state = CheckerState::Initialized;
        Ok(())
    }

    /// Initialises the checker and checks the network within the timeout of the options, then
    /// logs the statistics if statistic logging is configured.
    pub fn init_and_check(&mut self) -> Result<CheckStatus, CheckError> {
        let mut termination = self.options.termination();
        let status = self.dynamic_consistency_check(&mut termination)?;
        status.log_statistics();
        Ok(status)
    }

    /// Checks the network, initialising the checker first if needed.
    ///
    /// Once a check has finished, its status is returned again without further propagation.
    pub fn dynamic_consistency_check(
        &mut self,
        termination: &mut impl TerminationCondition,
    ) -> Result<CheckStatus, CheckError> {
        if self.state.is_finished() {
            return Ok(self.status.clone());
        }
        let started = Instant::now();
        self.initialise()?;

        let (Some(z), Some(horizon)) = (self.z, self.horizon) else {
            unreachable!("an initialised checker knows Z and the horizon")
        };
        tnu_assert_simple!(self.state == CheckerState::Initialized);
        self.state = CheckerState::Propagating;

        let cycle_bound = cycle_bound(
            horizon.max_weight,
            self.graph.node_count(),
            self.graph.propositions().len(),
        );
        let mut context = RuleContext {
            graph: &mut self.graph,
            status: &mut self.status,
            z,
            horizon: horizon.value,
            with_node_labels: self.options.with_node_labels,
            propagate_only_to_z: self.options.propagate_only_to_z,
            rules: self.rule_set.enabled_rules(),
            links: &[],
        };
        let outcome = propagate_to_fixpoint(&mut context, termination, cycle_bound)?;
        outcome.record(&mut self.status);

        self.status.execution_time += started.elapsed();
        self.state = CheckerState::Finished(self.status.outcome());
        info!("{}", self.status);
        Ok(self.status.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::CheckOutcome;
    use crate::engine::labeled::RestrictedRuleSet;
    use crate::engine::termination::Indefinite;
    use crate::graph::LabeledEdge;
    use crate::graph::Node;
    use crate::labels::Proposition;

    fn label(s: &str) -> Label {
        s.parse().unwrap()
    }

    fn proposition(c: char) -> Proposition {
        Proposition::from_char(c).unwrap()
    }

    /// `P?` observes `p`; `X` has to be at 10 if `p` and at 8 if not, while `P?` occurs at 7.
    fn late_observation() -> LabeledGraph {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("Z"));
        let _ = graph.add_node(Node::new("P?").observing(proposition('p')));
        let _ = graph.add_node(Node::new("X"));
        let _ = graph.add_edge("ZP", LabeledEdge::ordinary(Label::EMPTY, 7), "Z", "P?");
        let _ = graph.add_edge("PZ", LabeledEdge::ordinary(Label::EMPTY, -7), "P?", "Z");
        let _ = graph.add_edge(
            "ZX",
            LabeledEdge::ordinary(label("p"), 10).with_value(label("¬p"), 8),
            "Z",
            "X",
        );
        let _ = graph.add_edge(
            "XZ",
            LabeledEdge::ordinary(label("p"), -10).with_value(label("¬p"), -8),
            "X",
            "Z",
        );
        graph
    }

    #[test]
    fn a_negative_cycle_is_inconsistent() {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("Z"));
        let _ = graph.add_node(Node::new("A"));
        let _ = graph.add_node(Node::new("B"));
        let _ = graph.add_edge("ZA", LabeledEdge::ordinary(Label::EMPTY, 0), "Z", "A");
        let _ = graph.add_edge("AB", LabeledEdge::ordinary(Label::EMPTY, 0), "A", "B");
        let _ = graph.add_edge("BZ", LabeledEdge::ordinary(Label::EMPTY, -1), "B", "Z");
        let mut checker = CstnChecker::new(graph, CheckerOptions::default());

        let status = checker.init_and_check().unwrap();

        assert_eq!(CheckOutcome::Inconsistent, status.outcome());
        assert!(status.negative_loop.is_some());
        assert_eq!(CheckerState::Finished(CheckOutcome::Inconsistent), checker.state());
    }

    #[test]
    fn a_late_observation_is_consistent() {
        let mut checker = CstnChecker::new(late_observation(), CheckerOptions::default());

        let status = checker.init_and_check().unwrap();

        assert_eq!(CheckOutcome::Consistent, status.outcome());
        assert!(status.total_rule_applications() > 0);
    }

    #[test]
    fn a_late_observation_derives_no_unknown_free_negative_loop() {
        let mut checker = CstnChecker::new(late_observation(), CheckerOptions::default());

        let status = checker.init_and_check().unwrap();

        assert_eq!(None, status.negative_loop);
        let graph = checker.graph();
        let p = graph.find_node("P?").unwrap();
        let z = graph.find_node("Z").unwrap();
        let to_z = graph.edge(graph.find_edge(p, z).unwrap()).values();
        assert_eq!(Some(-7), to_z.min_value());
        for node in graph.nodes() {
            if let Some(self_loop) = graph.find_edge(node, node) {
                assert!(graph
                    .edge(self_loop)
                    .values()
                    .labels()
                    .all(|label| label.contains_unknown()));
            }
        }
    }

    #[test]
    fn the_time_window_depends_on_the_scenario() {
        let mut checker = CstnChecker::new(late_observation(), CheckerOptions::default());
        let _ = checker.init_and_check().unwrap();
        let x = checker.graph().find_node("X").unwrap();

        assert_eq!(Some((10, 10)), checker.time_window(x, label("p")));
        assert_eq!(Some((8, 8)), checker.time_window(x, label("¬p")));
        assert_eq!(Some((8, 10)), checker.time_window(x, Label::EMPTY));
    }

    #[test]
    fn an_uninitialised_checker_has_no_time_window() {
        let checker = CstnChecker::new(late_observation(), CheckerOptions::default());
        let x = checker.graph().find_node("X").unwrap();

        assert_eq!(None, checker.time_window(x, Label::EMPTY));
    }

    #[test]
    fn an_early_observation_is_inconsistent() {
        let mut graph = late_observation();
        let edge = graph.find_edge_by_name("ZP").unwrap();
        *graph.edge_mut(edge) = LabeledEdge::ordinary(Label::EMPTY, 12);
        let edge = graph.find_edge_by_name("PZ").unwrap();
        *graph.edge_mut(edge) = LabeledEdge::ordinary(Label::EMPTY, -12);
        let mut checker = CstnChecker::new(graph, CheckerOptions::default());

        let status = checker.init_and_check().unwrap();

        assert_eq!(CheckOutcome::Inconsistent, status.outcome());
    }

    #[test]
    fn the_restricted_rule_set_reaches_the_same_verdict() {
        let mut checker = CstnChecker::with_rule_set(
            late_observation(),
            CheckerOptions::default().propagating_only_to_z(),
            RestrictedRuleSet,
        );

        let status = checker.init_and_check().unwrap();

        assert_eq!(CheckOutcome::Consistent, status.outcome());
    }

    #[test]
    fn contingent_edges_are_rejected() {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("Z"));
        let _ = graph.add_node(Node::new("C"));
        let _ = graph.add_edge("ZC", LabeledEdge::contingent(Label::EMPTY, 5), "Z", "C");
        let mut checker = CstnChecker::new(graph, CheckerOptions::default());

        assert!(matches!(
            checker.init_and_check(),
            Err(CheckError::Structural(_))
        ));
    }

    #[test]
    fn a_finished_check_is_not_repeated() {
        let mut checker = CstnChecker::new(late_observation(), CheckerOptions::default());
        let first = checker.dynamic_consistency_check(&mut Indefinite).unwrap();

        let second = checker.dynamic_consistency_check(&mut Indefinite).unwrap();

        assert_eq!(first.cycles, second.cycles);
        assert_eq!(first.rule_applications, second.rule_applications);
    }

    #[test]
    fn the_cleaned_graph_has_no_unknown_literals() {
        let mut checker = CstnChecker::new(late_observation(), CheckerOptions::default());
        let _ = checker.init_and_check().unwrap();

        let cleaned = checker.graph_cleaned();

        for edge in cleaned.edges() {
            assert!(cleaned
                .edge(edge)
                .values()
                .labels()
                .all(|label| !label.contains_unknown()));
        }
    }
}
