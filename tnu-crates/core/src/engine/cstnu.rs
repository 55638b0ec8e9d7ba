use std::time::Instant;

use enumset::EnumSet;
use log::info;

use super::labeled::add_bounds_to_z;
use super::labeled::check_well_definedness;
use super::labeled::cleaned;
use super::labeled::compute_horizon;
use super::labeled::cycle_bound;
use super::labeled::init_upper_lower_label_data_structure;
use super::labeled::propagate_to_fixpoint;
use super::labeled::ContingentLink;
use super::labeled::FullRuleSet;
use super::labeled::Horizon;
use super::labeled::PropagationOutcome;
use super::labeled::RuleContext;
use super::labeled::RuleSet;
use super::termination::TerminationCondition;
use super::CheckerOptions;
use super::CheckerState;
use super::CstnChecker;
use crate::basic_types::CheckError;
use crate::basic_types::CheckOutcome;
use crate::basic_types::CheckStatus;
use crate::basic_types::PropagationRule;
use crate::graph::ConstraintKind;
use crate::graph::EdgeData;
use crate::graph::LabeledGraph;
use crate::graph::NodeId;
use crate::tnu_asserts::tnu_assert_simple;

/// Checks the dynamic controllability of a conditional simple temporal network with
/// uncertainty.
///
/// Contingent links are given as pairs of [`ConstraintKind::Contingent`] edges
/// `A → C (y)` and `C → A (-x)` with `0 < x < y`. After the labeled rules reach a fixpoint, the
/// all-max projection of the network is checked for consistency.
#[derive(Debug)]
pub struct CstnuChecker {
    graph: LabeledGraph,
    options: CheckerOptions,
    state: CheckerState,
    status: CheckStatus,
    z: Option<NodeId>,
    horizon: Option<Horizon>,
    links: Vec<ContingentLink>,
}

impl CstnuChecker {
    pub fn new(graph: LabeledGraph, options: CheckerOptions) -> Self {
        CstnuChecker {
            graph,
            options,
            state: CheckerState::Uninitialized,
            status: CheckStatus::default(),
            z: None,
            horizon: None,
            links: Vec::new(),
        }
    }

    pub fn state(&self) -> CheckerState {
        self.state
    }

    pub fn status(&self) -> &CheckStatus {
        &self.status
    }

    pub fn graph(&self) -> &LabeledGraph {
        &self.graph
    }

    pub fn into_graph(self) -> LabeledGraph {
        self.graph
    }

    pub fn graph_cleaned(&self) -> LabeledGraph {
        cleaned(&self.graph)
    }

    pub fn horizon(&self) -> Option<i32> {
        self.horizon.map(|horizon| horizon.value)
    }

    /// The rules applied during propagation.
    pub fn enabled_rules(&self) -> EnumSet<PropagationRule> {
        FullRuleSet.enabled_rules() | PropagationRule::CrossLowerCase | PropagationRule::LetterRemoval
    }

    /// Checks and fixes the network, sets up the contingent links and bounds every node with
    /// respect to Z.
    pub fn initialise(&mut self) -> Result<(), CheckError> {
        if self.state != CheckerState::Uninitialized {
            return Ok(());
        }
        let with_node_labels = self.options.with_node_labels;

        let z = check_well_definedness(&mut self.graph, with_node_labels, &mut self.status)?;
        self.links = init_upper_lower_label_data_structure(&mut self.graph)?;
        let horizon = compute_horizon(&self.graph)?;
        add_bounds_to_z(&mut self.graph, z, horizon.value, with_node_labels);

        info!(
            "initialised a network with {} nodes, {} edges and {} contingent links, horizon {}",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.links.len(),
            horizon.value
        );
        self.z = Some(z);
        self.horizon = Some(horizon);
        self.state = CheckerState::Initialized;
        Ok(())
    }

    pub fn init_and_check(&mut self) -> Result<CheckStatus, CheckError> {
        let mut termination = self.options.termination();
        let status = self.dynamic_controllability_check(&mut termination)?;
        status.log_statistics();
        Ok(status)
    }

    /// Checks the network, initialising the checker first if needed.
    pub fn dynamic_controllability_check(
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
        let rules = self.enabled_rules();
        let mut context = RuleContext {
            graph: &mut self.graph,
            status: &mut self.status,
            z,
            horizon: horizon.value,
            with_node_labels: self.options.with_node_labels,
            propagate_only_to_z: false,
            rules,
            links: &self.links,
        };
        let outcome = propagate_to_fixpoint(&mut context, termination, cycle_bound)?;

        if outcome == PropagationOutcome::Fixpoint {
            self.check_all_max_projection(termination)?;
        } else {
            outcome.record(&mut self.status);
        }

        self.status.execution_time += started.elapsed();
        self.state = CheckerState::Finished(self.status.outcome());
        info!("{}", self.status);
        Ok(self.status.clone())
    }

    fn check_all_max_projection(
        &mut self,
        termination: &mut impl TerminationCondition,
    ) -> Result<(), CheckError> {
        info!("checking the consistency of the all-max projection");
        let options = CheckerOptions {
            propagate_only_to_z: false,
            ..self.options
        };
        let mut projection = CstnChecker::new(self.all_max_projection(), options);
        let projected = projection.dynamic_consistency_check(termination)?;

        self.status.add_counters(&projected);
        match projected.outcome() {
            CheckOutcome::Consistent => self.status.set_consistent(),
            CheckOutcome::Inconsistent => self.status.set_inconsistent(projected.negative_loop),
            CheckOutcome::Timeout => self.status.set_timeout(),
            CheckOutcome::CycleBoundExceeded => self.status.set_cycle_bound_exceeded(),
            CheckOutcome::NotFinished => {}
        }
        Ok(())
    }

    /// The network in which every contingent duration takes its maximum: upper-case values
    /// become ordinary values, lower-case values are dropped and contingent edges become
    /// ordinary edges.
    ///
    /// Values with unknown literals are left out; they are derived again when the projection
    /// is checked.
    pub fn all_max_projection(&self) -> LabeledGraph {
        let mut projection = self.graph.clone();
        for edge in projection.edges().collect::<Vec<_>>() {
            let data = projection.edge_mut(edge);
            let _ = data.remove_unknown_labels();
            let upper_case_values = data.upper_case_values().iter().collect::<Vec<_>>();
            for (_, label, value) in upper_case_values {
                let _ = data.merge_labeled_value(label, value);
            }
            data.clear_case_values();
            if data.kind() == ConstraintKind::Contingent {
                data.set_kind(ConstraintKind::Ordinary);
            }
        }
        projection
    }
}
