use log::debug;
use log::error;
use log::info;

use super::case_rules::apply_cross_lower_case;
use super::case_rules::apply_letter_removal;
use super::label_propagation::apply_label_propagation;
use super::observation_rules::apply_r0;
use super::observation_rules::apply_r3;
use super::RuleContext;
use crate::basic_types::ArithmeticRangeError;
use crate::basic_types::CheckStatus;
use crate::basic_types::Inconsistency;
use crate::basic_types::NegativeLoop;
use crate::engine::edge_queue::EdgeQueue;
use crate::engine::termination::TerminationCondition;
use crate::graph::EdgeId;
use crate::graph::NodeId;

/// How a propagation loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PropagationOutcome {
    /// No rule changes the network anymore.
    Fixpoint,
    NegativeLoop(NegativeLoop),
    Timeout,
    CycleBoundExceeded,
}

impl PropagationOutcome {
    /// Records the outcome in `status`; a fixpoint means the network is consistent.
    pub(crate) fn record(self, status: &mut CheckStatus) {
        match self {
            PropagationOutcome::Fixpoint => status.set_consistent(),
            PropagationOutcome::NegativeLoop(negative_loop) => {
                info!("negative loop {negative_loop}");
                status.set_inconsistent(Some(negative_loop));
            }
            PropagationOutcome::Timeout => status.set_timeout(),
            PropagationOutcome::CycleBoundExceeded => status.set_cycle_bound_exceeded(),
        }
    }
}

/// Applies the enabled rules until no edge changes, a negative loop is found or the check has to
/// give up.
///
/// Every pass first applies the observation rules to the edges of the worklist and then uses each
/// of those edges in every triangle it is part of; the edges changed during a pass form the
/// worklist of the next one.
pub(crate) fn propagate_to_fixpoint(
    context: &mut RuleContext<'_>,
    termination: &mut impl TerminationCondition,
    cycle_bound: u64,
) -> Result<PropagationOutcome, ArithmeticRangeError> {
    match run_passes(context, termination, cycle_bound) {
        Ok(outcome) => Ok(outcome),
        Err(Inconsistency::NegativeLoop(negative_loop)) => {
            Ok(PropagationOutcome::NegativeLoop(negative_loop))
        }
        Err(Inconsistency::Arithmetic(error)) => Err(error),
    }
}

fn run_passes(
    context: &mut RuleContext<'_>,
    termination: &mut impl TerminationCondition,
    cycle_bound: u64,
) -> Result<PropagationOutcome, Inconsistency> {
    let mut worklist = context.graph.edges().collect::<EdgeQueue>();

    while !worklist.is_empty() {
        context.status.cycles += 1;
        if context.status.cycles > cycle_bound {
            error!("exceeded the bound of {cycle_bound} cycles");
            return Ok(PropagationOutcome::CycleBoundExceeded);
        }
        if termination.should_stop() {
            return Ok(PropagationOutcome::Timeout);
        }
        debug!(
            "cycle {}: {} edges to check",
            context.status.cycles,
            worklist.len()
        );

        let edges = std::iter::from_fn(|| worklist.pop()).collect::<Vec<_>>();
        let mut next = EdgeQueue::default();
        for &edge in &edges {
            apply_observation_rules(context, edge, &mut next)?;
        }
        for &edge in &edges {
            if termination.should_stop() {
                return Ok(PropagationOutcome::Timeout);
            }
            apply_triangle_rules(context, edge, &mut next)?;
        }
        worklist = next;
    }

    Ok(PropagationOutcome::Fixpoint)
}

fn enqueue(context: &RuleContext<'_>, source: NodeId, target: NodeId, queue: &mut EdgeQueue) {
    if let Some(edge) = context.graph.find_edge(source, target) {
        queue.enqueue(edge);
    }
}

fn apply_observation_rules(
    context: &mut RuleContext<'_>,
    edge: EdgeId,
    next: &mut EdgeQueue,
) -> Result<(), Inconsistency> {
    let (source, target) = context.graph.endpoints(edge);

    let r0 = apply_r0(context, source, target)?;
    let r3 = apply_r3(context, source, target)?;
    if r0 || r3 {
        next.enqueue(edge);
    }

    // The edge may itself be an observation edge for the other edges into its target.
    if context.graph.node(source).is_observer() {
        let others = context
            .graph
            .in_edges(target)
            .map(|(other, _)| other)
            .filter(|&other| other != source)
            .collect::<Vec<_>>();
        for other in others {
            if apply_r3(context, other, target)? {
                enqueue(context, other, target, next);
            }
        }
    }
    Ok(())
}

fn apply_triangle_rules(
    context: &mut RuleContext<'_>,
    edge: EdgeId,
    next: &mut EdgeQueue,
) -> Result<(), Inconsistency> {
    let (a, b) = context.graph.endpoints(edge);
    let z = context.z;
    let only_to_z = context.propagate_only_to_z;

    let successors = context
        .graph
        .out_edges(b)
        .map(|(w, _)| w)
        .collect::<Vec<_>>();
    for &w in successors.iter().filter(|&&w| !only_to_z || w == z) {
        if apply_label_propagation(context, a, b, w)? {
            enqueue(context, a, w, next);
        }
    }

    if !only_to_z || b == z {
        let predecessors = context
            .graph
            .in_edges(a)
            .map(|(x, _)| x)
            .collect::<Vec<_>>();
        for x in predecessors {
            if apply_label_propagation(context, x, a, b)? {
                enqueue(context, x, b, next);
            }
        }
    }

    if context.links.is_empty() {
        return Ok(());
    }

    if context.graph.edge(edge).lower_case_value().is_some() {
        for &w in &successors {
            if apply_cross_lower_case(context, a, b, w)? {
                enqueue(context, a, w, next);
            }
        }
    }
    if let Some(activation) = context.link_of(a).map(|link| link.activation) {
        if apply_cross_lower_case(context, activation, a, b)? {
            enqueue(context, activation, b, next);
        }
    }
    if apply_letter_removal(context, a, b)? {
        next.enqueue(edge);
    }
    Ok(())
}
