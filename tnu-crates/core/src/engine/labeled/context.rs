use enumset::EnumSet;
use log::trace;

use crate::basic_types::CheckStatus;
use crate::basic_types::NegativeLoop;
use crate::basic_types::PropagationRule;
use crate::graph::ConstraintKind;
use crate::graph::LabeledEdge;
use crate::graph::LabeledGraph;
use crate::graph::NodeId;
use crate::labels::CaseLabel;
use crate::labels::CaseLetter;
use crate::labels::Label;
use crate::labels::Proposition;
use crate::labels::PropositionSet;
use crate::math::extended_int::ExtendedInt;
use crate::math::POS_INFINITY;

/// A contingent link `(activation, lower, upper, contingent)` of a conditional network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ContingentLink {
    pub(crate) activation: NodeId,
    pub(crate) contingent: NodeId,
    pub(crate) letter: CaseLetter,
    /// The label of the lower-case value on the edge from the activation node.
    pub(crate) label: Label,
    pub(crate) lower: i32,
    pub(crate) upper: i32,
}

/// Everything a rule needs to read and update during one propagation.
#[derive(Debug)]
pub(crate) struct RuleContext<'a> {
    pub(crate) graph: &'a mut LabeledGraph,
    pub(crate) status: &'a mut CheckStatus,
    pub(crate) z: NodeId,
    pub(crate) horizon: i32,
    pub(crate) with_node_labels: bool,
    pub(crate) propagate_only_to_z: bool,
    pub(crate) rules: EnumSet<PropagationRule>,
    pub(crate) links: &'a [ContingentLink],
}

impl RuleContext<'_> {
    pub(crate) fn is_enabled(&self, rule: PropagationRule) -> bool {
        self.rules.contains(rule)
    }

    pub(crate) fn node_label(&self, node: NodeId) -> Label {
        if self.with_node_labels {
            self.graph.node(node).label()
        } else {
            Label::EMPTY
        }
    }

    pub(crate) fn children(&self, proposition: Proposition) -> PropositionSet {
        if self.with_node_labels {
            self.graph.children_of_observer(proposition)
        } else {
            PropositionSet::EMPTY
        }
    }

    /// Drops the propositions whose observers only occur when an unknown literal of `label` is
    /// decided.
    pub(crate) fn remove_children_of_unknown(&self, label: Label) -> Label {
        if !self.with_node_labels {
            return label;
        }
        let children = label
            .unknown_propositions()
            .iter()
            .fold(PropositionSet::EMPTY, |children, proposition| {
                children.union(self.children(proposition))
            });
        label.remove_propositions(children)
    }

    /// Conjoins `label` with the labels of both endpoints of an edge.
    pub(crate) fn with_endpoint_labels(
        &self,
        label: Label,
        source: NodeId,
        target: NodeId,
    ) -> Option<Label> {
        label
            .conjunction(self.node_label(source))?
            .conjunction(self.node_label(target))
    }

    /// Merges a value into the edge `source → target`, adding a derived edge if there is none.
    pub(crate) fn merge(
        &mut self,
        source: NodeId,
        target: NodeId,
        case_label: CaseLabel,
        label: Label,
        value: i32,
        rule: PropagationRule,
    ) -> bool {
        let edge = match self.graph.find_edge(source, target) {
            Some(edge) => edge,
            None if value == POS_INFINITY => return false,
            None => self.graph.edge_or_insert(source, target, || {
                LabeledEdge::new(ConstraintKind::Derived)
            }),
        };

        let changed = self
            .graph
            .edge_values_mut(edge)
            .merge_upper_case_value(case_label, label, value);
        if changed {
            self.status.record_rule(rule);
            trace!(
                "{rule}: {}→{} ({label}, {case_label}:{})",
                self.graph.node(source).name(),
                self.graph.node(target).name(),
                ExtendedInt(value)
            );
        }
        changed
    }

    pub(crate) fn negative_loop(&self, node: NodeId, label: Label, value: i32) -> NegativeLoop {
        NegativeLoop {
            node: self.graph.node(node).name().to_owned(),
            label,
            value,
        }
    }

    pub(crate) fn links_activated_by(
        &self,
        activation: NodeId,
    ) -> impl Iterator<Item = &ContingentLink> + '_ {
        self.links
            .iter()
            .filter(move |link| link.activation == activation)
    }

    pub(crate) fn link_of(&self, contingent: NodeId) -> Option<&ContingentLink> {
        self.links.iter().find(|link| link.contingent == contingent)
    }
}
