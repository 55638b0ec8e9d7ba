//! The dynamic controllability check of simple temporal networks with uncertainty.
mod initialisation;
mod morris;
mod potential;
mod rul;

use std::time::Instant;

use log::info;

use self::initialisation::initialise_stnu;
use self::morris::morris_2014;
use self::potential::bellman_ford_ol;
use self::rul::rul;
use super::termination::TerminationCondition;
use super::CheckerOptions;
use super::CheckerState;
use super::StnuAlgorithm;
use crate::basic_types::ArithmeticRangeError;
use crate::basic_types::CheckError;
use crate::basic_types::CheckStatus;
use crate::graph::ConstraintKind;
use crate::graph::NodeId;
use crate::graph::StnuEdge;
use crate::graph::StnuGraph;
use crate::tnu_asserts::tnu_assert_simple;

/// A contingent link `(activation, lower, upper, contingent)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StnuLink {
    pub(crate) activation: NodeId,
    pub(crate) contingent: NodeId,
    pub(crate) lower: i32,
    pub(crate) upper: i32,
}

/// Why an algorithm stopped without concluding that the network is controllable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Interruption {
    NotControllable,
    Timeout,
    Arithmetic(ArithmeticRangeError),
}

impl From<ArithmeticRangeError> for Interruption {
    fn from(value: ArithmeticRangeError) -> Self {
        Interruption::Arithmetic(value)
    }
}

pub(crate) type StnuResult<T> = Result<T, Interruption>;

/// Converts a derived distance into an edge weight.
pub(crate) fn weight(value: i64) -> Result<i32, ArithmeticRangeError> {
    i32::try_from(value)
        .ok()
        .filter(|&weight| crate::math::extended_int::is_finite(weight))
        .ok_or(ArithmeticRangeError::WeightOverflow { value })
}

/// Tightens the ordinary value of `source → target` to `value`, adding a derived edge if needed.
///
/// Returns whether the network changed.
pub(crate) fn tighten(graph: &mut StnuGraph, source: NodeId, target: NodeId, value: i32) -> bool {
    let edge = graph.edge_or_insert(source, target, || StnuEdge::new(ConstraintKind::Derived));
    graph.edge_values_mut(edge).update_value(value)
}

/// Checks the dynamic controllability of a simple temporal network with uncertainty.
///
/// A contingent link is given as the pair of [`ConstraintKind::Contingent`] edges
/// `A → C (y)` and `C → A (-x)` with `0 <= x < y`. The algorithm is chosen with
/// [`CheckerOptions::stnu_algorithm`]; the checker adds the edges it derives to the network.
#[derive(Debug)]
pub struct StnuChecker {
    graph: StnuGraph,
    options: CheckerOptions,
    state: CheckerState,
    status: CheckStatus,
    links: Vec<StnuLink>,
}

impl StnuChecker {
    pub fn new(graph: StnuGraph, options: CheckerOptions) -> Self {
        StnuChecker {
            graph,
            options,
            state: CheckerState::Uninitialized,
            status: CheckStatus::default(),
            links: Vec::new(),
        }
    }

    pub fn state(&self) -> CheckerState {
        self.state
    }

    pub fn status(&self) -> &CheckStatus {
        &self.status
    }

    pub fn graph(&self) -> &StnuGraph {
        &self.graph
    }

    pub fn into_graph(self) -> StnuGraph {
        self.graph
    }

    /// Adds Z if it is missing, bounds every node to be after Z and sets up the contingent
    /// links.
    pub fn initialise(&mut self) -> Result<(), CheckError> {
        if self.state != CheckerState::Uninitialized {
            return Ok(());
        }
        self.links = initialise_stnu(&mut self.graph, &mut self.status)?;
        info!(
            "initialised a network with {} nodes, {} edges and {} contingent links",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.links.len()
        );
        self.state = CheckerState::Initialized;
        Ok(())
    }

    pub fn init_and_check(&mut self) -> Result<CheckStatus, CheckError> {
        let mut termination = self.options.termination();
        let status = self.dynamic_controllability_check(&mut termination)?;
        status.log_statistics();
        Ok(status)
    }

    /// Checks the network with the configured algorithm, initialising the checker first if
    /// needed.
    pub fn dynamic_controllability_check(
        &mut self,
        termination: &mut impl TerminationCondition,
    ) -> Result<CheckStatus, CheckError> {
        if self.state.is_finished() {
            return Ok(self.status.clone());
        }
        let started = Instant::now();
        self.initialise()?;
        tnu_assert_simple!(self.state == CheckerState::Initialized);
        self.state = CheckerState::Propagating;

        let algorithm = self.options.stnu_algorithm;
        info!("checking controllability with {algorithm}");
        let statistics = &mut self.status.stnu;
        let result = match algorithm {
            StnuAlgorithm::Morris2014 => {
                morris_2014(&mut self.graph, &mut self.links, statistics, termination)
            }
            StnuAlgorithm::Rul2018 | StnuAlgorithm::Rul2020 => {
                bellman_ford_ol(&mut self.graph, statistics).and_then(|()| {
                    rul(
                        &mut self.graph,
                        &self.links,
                        algorithm == StnuAlgorithm::Rul2020,
                        statistics,
                        termination,
                    )
                })
            }
        };

        match result {
            Ok(()) => self.status.set_consistent(),
            Err(Interruption::NotControllable) => self.status.set_inconsistent(None),
            Err(Interruption::Timeout) => self.status.set_timeout(),
            Err(Interruption::Arithmetic(error)) => return Err(error.into()),
        }
        self.status.execution_time += started.elapsed();
        self.state = CheckerState::Finished(self.status.outcome());
        info!("{}", self.status);
        Ok(self.status.clone())
    }
}
