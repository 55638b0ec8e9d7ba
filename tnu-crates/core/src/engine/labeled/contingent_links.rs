use log::debug;

use super::ContingentLink;
use crate::basic_types::StructuralError;
use crate::graph::ConstraintKind;
use crate::graph::EdgeData;
use crate::graph::EdgeId;
use crate::graph::LabeledGraph;
use crate::labeled_values::LowerCaseValue;
use crate::labels::CaseLabel;
use crate::labels::CaseLetter;
use crate::labels::Label;

/// Turns every pair of contingent edges `A → C (y)`, `C → A (-x)` into a contingent link.
///
/// The lower-case value `(c, λ, x)` is set on `A → C`, the upper-case value `({C}, λ, -y)` is
/// merged on `C → A`; `C` is flagged contingent, given a case letter and `A` is recorded as its
/// activation node.
pub(crate) fn init_upper_lower_label_data_structure(
    graph: &mut LabeledGraph,
) -> Result<Vec<ContingentLink>, StructuralError> {
    let mut links: Vec<ContingentLink> = Vec::new();
    let mut used_letters = graph
        .nodes()
        .filter_map(|node| graph.node(node).case_letter())
        .fold(CaseLabel::EMPTY, |used, letter| {
            used.union(CaseLabel::from_letter(letter))
        });

    for edge in graph.contingent_edges().to_vec() {
        let (source, target) = graph.endpoints(edge);
        let companion = graph
            .find_edge(target, source)
            .filter(|&companion| graph.edge(companion).kind() == ConstraintKind::Contingent)
            .ok_or_else(|| StructuralError::MissingCompanion {
                edge: graph.edge_name(edge).to_owned(),
            })?;

        let (label, value) = contingent_value(graph, edge)?;
        let (_, companion_value) = contingent_value(graph, companion)?;
        if value == 0 || companion_value == 0 {
            return Err(StructuralError::ZeroContingentBound {
                contingent: contingent_name(graph, edge, value),
            });
        }
        if value < 0 {
            if companion_value < 0 {
                return Err(StructuralError::InvalidContingentRange {
                    contingent: graph.node(source).name().to_owned(),
                    lower: -value,
                    upper: companion_value,
                });
            }
            // Handled together with the companion.
            continue;
        }

        let (activation, contingent) = (source, target);
        let (lower, upper) = (-companion_value, value);
        if lower <= 0 || upper <= lower {
            return Err(StructuralError::InvalidContingentRange {
                contingent: graph.node(contingent).name().to_owned(),
                lower,
                upper,
            });
        }
        if let Some(first) = graph.activation_node(contingent).filter(|&first| first != activation) {
            return Err(StructuralError::MultipleActivations {
                contingent: graph.node(contingent).name().to_owned(),
                first: graph.node(first).name().to_owned(),
                second: graph.node(activation).name().to_owned(),
            });
        }

        // A letter given in the input is kept unless another contingent node already has it.
        let letter = match graph.node(contingent).case_letter() {
            Some(letter) if links.iter().all(|link| link.letter != letter) => letter,
            _ => first_unused_letter(used_letters).ok_or(
                StructuralError::TooManyContingentNodes {
                    maximum: CaseLetter::MAX,
                },
            )?,
        };
        used_letters = used_letters.union(CaseLabel::from_letter(letter));

        set_case_values(graph, edge, companion, letter, label, lower, upper)?;

        let node = graph.node_mut(contingent);
        node.set_contingent(true);
        node.set_case_letter(Some(letter));
        graph.set_activation_node(contingent, activation);

        let link = ContingentLink {
            activation,
            contingent,
            letter,
            label,
            lower,
            upper,
        };
        debug!(
            "contingent link ({}, {}, {}, {}) with letter {}",
            graph.node(link.activation).name(),
            link.lower,
            link.upper,
            graph.node(link.contingent).name(),
            link.letter
        );
        links.push(link);
    }

    Ok(links)
}

fn first_unused_letter(used: CaseLabel) -> Option<CaseLetter> {
    (0..CaseLetter::MAX)
        .filter_map(CaseLetter::from_index)
        .find(|&letter| !used.contains(letter))
}

fn contingent_name(graph: &LabeledGraph, edge: EdgeId, value: i32) -> String {
    let (source, target) = graph.endpoints(edge);
    let contingent = if value < 0 { source } else { target };
    graph.node(contingent).name().to_owned()
}

/// The single value of a contingent edge.
fn contingent_value(graph: &LabeledGraph, edge: EdgeId) -> Result<(Label, i32), StructuralError> {
    graph
        .edge(edge)
        .values()
        .iter()
        .next()
        .ok_or_else(|| StructuralError::EmptyContingentEdge {
            edge: graph.edge_name(edge).to_owned(),
        })
}

fn set_case_values(
    graph: &mut LabeledGraph,
    activation_edge: EdgeId,
    contingent_edge: EdgeId,
    letter: CaseLetter,
    label: Label,
    lower: i32,
    upper: i32,
) -> Result<(), StructuralError> {
    let lower_case = LowerCaseValue {
        letter,
        label,
        value: lower,
    };
    let case_label = CaseLabel::from_letter(letter);

    let present_lower = graph.edge(activation_edge).lower_case_value();
    let present_upper = graph
        .edge(contingent_edge)
        .upper_case_values()
        .get(case_label, label);
    if present_lower.is_some_and(|present| present != lower_case)
        || present_upper.is_some_and(|present| present != -upper)
    {
        return Err(StructuralError::ContradictoryCaseValues {
            edge: graph.edge_name(activation_edge).to_owned(),
        });
    }

    graph
        .edge_mut(activation_edge)
        .set_lower_case_value(Some(lower_case));
    let _ = graph
        .edge_mut(contingent_edge)
        .merge_upper_case_value(case_label, label, -upper);
    Ok(())
}
