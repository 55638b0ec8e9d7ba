//! The rules specific to conditional networks with contingent links.
use super::RuleContext;
use crate::basic_types::PropagationRule;
use crate::basic_types::RuleStatus;
use crate::graph::NodeId;
use crate::labels::CaseLabel;
use crate::math::extended_int::sum_with_overflow_check;
use crate::math::NEG_INFINITY;

/// Cross lower case: the lower-case value `x` on `activation → contingent` followed by a negative
/// value on `contingent → w` gives a value on `activation → w`.
pub(crate) fn apply_cross_lower_case(
    context: &mut RuleContext<'_>,
    activation: NodeId,
    contingent: NodeId,
    w: NodeId,
) -> RuleStatus {
    if !context.is_enabled(PropagationRule::CrossLowerCase) || w == contingent {
        return Ok(false);
    }
    let Some(lower_case) = context
        .graph
        .find_edge(activation, contingent)
        .and_then(|edge| context.graph.edge(edge).lower_case_value())
    else {
        return Ok(false);
    };
    let Some(edge) = context.graph.find_edge(contingent, w) else {
        return Ok(false);
    };

    let mut changed = false;
    for (case_label, label, value) in context.graph.edge(edge).values_with_case() {
        if value >= 0 || case_label.contains(lower_case.letter) {
            continue;
        }
        let sum = sum_with_overflow_check(lower_case.value, value)?;
        let combined = if w == context.z && sum < 0 {
            lower_case.label.conjunction_extended(label)
        } else {
            if lower_case.label.contains_unknown() || label.contains_unknown() {
                continue;
            }
            let Some(combined) = lower_case.label.conjunction(label) else {
                continue;
            };
            combined
        };
        let combined = context.remove_children_of_unknown(combined);

        if w == activation {
            if sum >= 0 || !case_label.is_empty() {
                continue;
            }
            if !combined.contains_unknown() {
                return Err(context.negative_loop(activation, combined, sum).into());
            }
            changed |= context.merge(
                activation,
                w,
                CaseLabel::EMPTY,
                combined,
                NEG_INFINITY,
                PropagationRule::CrossLowerCase,
            );
            continue;
        }

        changed |= context.merge(
            activation,
            w,
            case_label,
            combined,
            sum,
            PropagationRule::CrossLowerCase,
        );
    }
    Ok(changed)
}

/// Letter removal: an upper-case value on `x → activation` for the letter of a contingent node
/// activated by `activation` no longer depends on that letter once it is at least the negated
/// lower bound of the link.
pub(crate) fn apply_letter_removal(
    context: &mut RuleContext<'_>,
    x: NodeId,
    activation: NodeId,
) -> RuleStatus {
    if !context.is_enabled(PropagationRule::LetterRemoval) {
        return Ok(false);
    }
    let Some(edge) = context.graph.find_edge(x, activation) else {
        return Ok(false);
    };
    let links = context
        .links_activated_by(activation)
        .copied()
        .collect::<Vec<_>>();
    if links.is_empty() {
        return Ok(false);
    }

    let upper_case_values = context
        .graph
        .edge(edge)
        .upper_case_values()
        .iter()
        .collect::<Vec<_>>();

    let mut changed = false;
    for (case_label, label, value) in upper_case_values {
        for link in &links {
            if !case_label.contains(link.letter)
                || i64::from(value) < -i64::from(link.lower)
                || !label.subsumes(link.label)
            {
                continue;
            }
            changed |= context.merge(
                x,
                activation,
                case_label.remove(link.letter),
                label,
                value,
                PropagationRule::LetterRemoval,
            );
        }
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use enumset::EnumSet;

    use super::*;
    use crate::basic_types::CheckStatus;
    use crate::basic_types::Inconsistency;
    use crate::engine::labeled::ContingentLink;
    use crate::graph::ConstraintKind;
    use crate::graph::LabeledEdge;
    use crate::graph::LabeledGraph;
    use crate::graph::Node;
    use crate::labeled_values::LowerCaseValue;
    use crate::labels::CaseLetter;
    use crate::labels::Label;

    struct Network {
        graph: LabeledGraph,
        a: NodeId,
        c: NodeId,
        link: ContingentLink,
    }

    /// The contingent link `(A, 2, 5, C)` with letter `C`.
    fn network() -> Network {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("Z")).unwrap();
        let a = graph.add_node(Node::new("A")).unwrap();
        let c = graph.add_node(Node::new("C").contingent()).unwrap();
        let letter = CaseLetter::from_index(2).unwrap();

        let mut activation_edge = LabeledEdge::contingent(Label::EMPTY, 5);
        activation_edge.set_lower_case_value(Some(LowerCaseValue {
            letter,
            label: Label::EMPTY,
            value: 2,
        }));
        let _ = graph.add_edge("AC", activation_edge, "A", "C");
        let mut contingent_edge = LabeledEdge::contingent(Label::EMPTY, -2);
        let _ = contingent_edge.merge_upper_case_value(CaseLabel::from_letter(letter), Label::EMPTY, -5);
        let _ = graph.add_edge("CA", contingent_edge, "C", "A");
        graph.set_activation_node(c, a);

        Network {
            graph,
            a,
            c,
            link: ContingentLink {
                activation: a,
                contingent: c,
                letter,
                label: Label::EMPTY,
                lower: 2,
                upper: 5,
            },
        }
    }

    fn context<'a>(
        graph: &'a mut LabeledGraph,
        status: &'a mut CheckStatus,
        links: &'a [ContingentLink],
    ) -> RuleContext<'a> {
        let z = graph.z().unwrap();
        RuleContext {
            graph,
            status,
            z,
            horizon: 100,
            with_node_labels: true,
            propagate_only_to_z: false,
            rules: EnumSet::all(),
            links,
        }
    }

    #[test]
    fn cross_lower_case_adds_the_lower_bound() {
        let mut network = network();
        let x = network.graph.add_node(Node::new("X")).unwrap();
        let _ = network
            .graph
            .add_edge("CX", LabeledEdge::ordinary(Label::EMPTY, -4), "C", "X");
        let links = [network.link];
        let mut status = CheckStatus::default();
        let mut context = context(&mut network.graph, &mut status, &links);

        assert_eq!(
            Ok(true),
            apply_cross_lower_case(&mut context, network.a, network.c, x)
        );

        let derived = network.graph.find_edge(network.a, x).unwrap();
        assert_eq!(
            Some(-2),
            network.graph.edge(derived).values().get(Label::EMPTY)
        );
        assert_eq!(1, status.rule_applications[PropagationRule::CrossLowerCase]);
    }

    #[test]
    fn cross_lower_case_detects_a_negative_loop() {
        let mut network = network();
        let _ = network
            .graph
            .edge_mut(network.graph.find_edge(network.c, network.a).unwrap())
            .merge_labeled_value(Label::EMPTY, -3);
        let links = [network.link];
        let mut status = CheckStatus::default();
        let mut context = context(&mut network.graph, &mut status, &links);

        let result = apply_cross_lower_case(&mut context, network.a, network.c, network.a);

        assert!(matches!(result, Err(Inconsistency::NegativeLoop(_))));
    }

    #[test]
    fn letter_removal_drops_the_letter() {
        let mut network = network();
        let x = network.graph.add_node(Node::new("X")).unwrap();
        let mut edge = LabeledEdge::new(ConstraintKind::Derived);
        let _ = edge.merge_upper_case_value(CaseLabel::from_letter(network.link.letter), Label::EMPTY, -1);
        let edge = network.graph.add_edge_between("XA", edge, x, network.a).unwrap();
        let links = [network.link];
        let mut status = CheckStatus::default();
        let mut context = context(&mut network.graph, &mut status, &links);

        assert_eq!(Ok(true), apply_letter_removal(&mut context, x, network.a));

        let edge = network.graph.edge(edge);
        assert_eq!(Some(-1), edge.values().get(Label::EMPTY));
        assert!(edge.upper_case_values().is_empty());
    }

    #[test]
    fn letter_removal_keeps_values_below_the_lower_bound() {
        let mut network = network();
        let x = network.graph.add_node(Node::new("X")).unwrap();
        let mut edge = LabeledEdge::new(ConstraintKind::Derived);
        let _ = edge.merge_upper_case_value(CaseLabel::from_letter(network.link.letter), Label::EMPTY, -3);
        let _ = network.graph.add_edge_between("XA", edge, x, network.a);
        let links = [network.link];
        let mut status = CheckStatus::default();
        let mut context = context(&mut network.graph, &mut status, &links);

        assert_eq!(Ok(false), apply_letter_removal(&mut context, x, network.a));
    }
}
