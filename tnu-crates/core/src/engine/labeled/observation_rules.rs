//! The rules which remove a proposition from a label once the value is known to constrain the
//! network before the proposition is observed.
use super::RuleContext;
use crate::basic_types::PropagationRule;
use crate::basic_types::RuleStatus;
use crate::graph::NodeId;
use crate::labeled_values::LabeledValueMap;
use crate::labels::Label;
use crate::labels::Proposition;

/// R0 (qR0 if `target` is Z): a non-positive value on an edge from the observer of `p` does not
/// depend on `p`.
pub(crate) fn apply_r0(context: &mut RuleContext<'_>, observer: NodeId, target: NodeId) -> RuleStatus {
    if observer == target {
        return Ok(false);
    }
    let Some(proposition) = context.graph.node(observer).observed() else {
        return Ok(false);
    };
    let towards_z = target == context.z;
    let rule = if towards_z {
        PropagationRule::QR0
    } else {
        PropagationRule::R0
    };
    if !context.is_enabled(rule) {
        return Ok(false);
    }
    let Some(edge) = context.graph.find_edge(observer, target) else {
        return Ok(false);
    };

    let mut changed = false;
    for (case_label, label, value) in context.graph.edge(edge).values_with_case() {
        if value > 0 || !label.contains_proposition(proposition) {
            continue;
        }
        if !towards_z && label.contains_unknown() {
            continue;
        }

        let stripped = label
            .remove(proposition)
            .remove_propositions(context.children(proposition));
        let Some(stripped) = context.with_endpoint_labels(stripped, observer, target) else {
            continue;
        };
        if stripped.contains_proposition(proposition) || stripped == label {
            continue;
        }

        changed |= context.merge(observer, target, case_label, stripped, value, rule);
    }
    Ok(changed)
}

/// R3 (qR3 if `target` is Z): a value on `source → target` whose label mentions `p` is combined
/// with the non-positive values on the edge from the observer of `p` to `target`.
pub(crate) fn apply_r3(context: &mut RuleContext<'_>, source: NodeId, target: NodeId) -> RuleStatus {
    if source == target {
        return Ok(false);
    }
    let towards_z = target == context.z;
    let rule = if towards_z {
        PropagationRule::QR3
    } else {
        PropagationRule::R3
    };
    if !context.is_enabled(rule) {
        return Ok(false);
    }
    let Some(edge) = context.graph.find_edge(source, target) else {
        return Ok(false);
    };

    let values = context.graph.edge(edge).values_with_case();
    if values.iter().all(|(_, label, _)| label.is_empty()) {
        return Ok(false);
    }
    let observations = observation_values(context, source, target);

    let mut changed = false;
    for (proposition, observation) in observations {
        for &(case_label, label, value) in &values {
            if !label.contains_proposition(proposition) {
                continue;
            }
            if !towards_z
                && (label.contains_unknown()
                    || observation
                        .min_value_consistent_with(label.remove(proposition))
                        .is_none())
            {
                continue;
            }
            for (observation_label, observation_value) in
                observation.iter().filter(|&(_, value)| value <= 0)
            {
                if observation_label.contains_proposition(proposition) {
                    continue;
                }
                let Some(combined) = r3_label(
                    context,
                    label,
                    observation_label,
                    proposition,
                    towards_z,
                )
                .and_then(|combined| context.with_endpoint_labels(combined, source, target)) else {
                    continue;
                };
                if combined.contains_proposition(proposition) {
                    continue;
                }

                changed |= context.merge(
                    source,
                    target,
                    case_label,
                    combined,
                    value.max(observation_value),
                    rule,
                );
            }
        }
    }
    Ok(changed)
}

/// The ordinary values on the edges into `target` from observers other than `source` and
/// `target`, by observed proposition. Only maps with a non-positive value are returned.
fn observation_values(
    context: &RuleContext<'_>,
    source: NodeId,
    target: NodeId,
) -> Vec<(Proposition, LabeledValueMap)> {
    context
        .graph
        .in_edges(target)
        .filter(|&(observer, _)| observer != source && observer != target)
        .filter_map(|(observer, edge)| {
            let proposition = context.graph.node(observer).observed()?;
            let values = context.graph.edge(edge).values();
            values
                .min_value()
                .is_some_and(|value| value <= 0)
                .then(|| (proposition, values.clone()))
        })
        .collect()
}

fn r3_label(
    context: &RuleContext<'_>,
    label: Label,
    observation_label: Label,
    proposition: Proposition,
    towards_z: bool,
) -> Option<Label> {
    let base = label.remove(proposition);
    let combined = if towards_z {
        base.conjunction_extended(observation_label)
    } else {
        if observation_label.contains_unknown() {
            return None;
        }
        base.conjunction(observation_label)?
    };
    let combined = combined.remove_propositions(context.children(proposition));
    Some(context.remove_children_of_unknown(combined))
}
