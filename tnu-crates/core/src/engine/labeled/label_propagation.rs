use super::RuleContext;
use crate::basic_types::PropagationRule;
use crate::basic_types::RuleStatus;
use crate::graph::NodeId;
use crate::labels::Label;
use crate::math::extended_int::sum_with_overflow_check;
use crate::math::NEG_INFINITY;

/// Labeled propagation over the path `x → y → w`, storing the derived values on `x → w`.
///
/// Values with an upper-case label on the first edge are only combined when they are negative,
/// and two upper-case values are never combined if they share a letter. Self-loops are only ever
/// derived here, they are never one of the two legs.
pub(crate) fn apply_label_propagation(
    context: &mut RuleContext<'_>,
    x: NodeId,
    y: NodeId,
    w: NodeId,
) -> RuleStatus {
    if !context.is_enabled(PropagationRule::LabelPropagation) || x == y || y == w {
        return Ok(false);
    }
    let (Some(first), Some(second)) = (context.graph.find_edge(x, y), context.graph.find_edge(y, w))
    else {
        return Ok(false);
    };

    let first_values = context.graph.edge(first).values_with_case();
    let second_values = context.graph.edge(second).values_with_case();

    let mut changed = false;
    for &(first_case, first_label, u) in &first_values {
        if !first_case.is_empty() && u >= 0 {
            continue;
        }
        for &(second_case, second_label, v) in &second_values {
            if first_case.intersects(second_case) {
                continue;
            }
            let sum = clamp_to_horizon(context, sum_with_overflow_check(u, v)?);
            let Some(label) = propagated_label(context, (first_label, u), second_label, w, sum)
            else {
                continue;
            };
            let case_label = first_case.union(second_case);

            if x == w {
                if sum >= 0 || !case_label.is_empty() {
                    continue;
                }
                if !label.contains_unknown() {
                    return Err(context.negative_loop(x, label, sum).into());
                }
                changed |= context.merge(
                    x,
                    w,
                    case_label,
                    label,
                    NEG_INFINITY,
                    PropagationRule::LabelPropagation,
                );
                continue;
            }

            changed |= context.merge(
                x,
                w,
                case_label,
                label,
                sum,
                PropagationRule::LabelPropagation,
            );
        }
    }
    Ok(changed)
}

/// The label of a propagated value, or `None` if the value must not be derived.
///
/// Only negative sums towards Z over a negative first value may carry unknown literals; everywhere
/// else the labels must be consistent and free of unknown literals. A non-negative first value
/// lets the middle node occur after the source, when the source cannot know its scenario yet.
fn propagated_label(
    context: &RuleContext<'_>,
    (first, first_value): (Label, i32),
    second: Label,
    target: NodeId,
    sum: i32,
) -> Option<Label> {
    let label = if target == context.z && sum < 0 && first_value < 0 {
        first.conjunction_extended(second)
    } else {
        if first.contains_unknown() || second.contains_unknown() {
            return None;
        }
        first.conjunction(second)?
    };
    Some(context.remove_children_of_unknown(label))
}

/// Values below `-horizon` can only come from a negative cycle and are stored as `-∞`.
fn clamp_to_horizon(context: &RuleContext<'_>, value: i32) -> i32 {
    if i64::from(value) < -i64::from(context.horizon) {
        NEG_INFINITY
    } else {
        value
    }
}
