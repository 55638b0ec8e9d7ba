use crate::labels::CaseLetter;
use crate::labels::Label;
use crate::labels::Proposition;

/// A time-point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    /// The scenarios in which the node has to be executed.
    label: Label,
    /// The proposition whose value becomes known when the node is executed.
    observed: Option<Proposition>,
    contingent: bool,
    /// Set for contingent nodes of conditional networks once their link has been initialised.
    case_letter: Option<CaseLetter>,
    /// The potential computed by the STNU checker.
    potential: i64,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Node {
        Node {
            name: name.into(),
            label: Label::EMPTY,
            observed: None,
            contingent: false,
            case_letter: None,
            potential: 0,
        }
    }

    pub fn with_label(mut self, label: Label) -> Node {
        self.label = label;
        self
    }

    /// Makes the node the observer of `proposition`.
    pub fn observing(mut self, proposition: Proposition) -> Node {
        self.observed = Some(proposition);
        self
    }

    pub fn contingent(mut self) -> Node {
        self.contingent = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn set_label(&mut self, label: Label) {
        self.label = label;
    }

    pub fn observed(&self) -> Option<Proposition> {
        self.observed
    }

    pub fn is_observer(&self) -> bool {
        self.observed.is_some()
    }

    pub fn set_observed(&mut self, proposition: Option<Proposition>) {
        self.observed = proposition;
    }

    pub fn is_contingent(&self) -> bool {
        self.contingent
    }

    pub fn set_contingent(&mut self, contingent: bool) {
        self.contingent = contingent;
    }

    pub fn case_letter(&self) -> Option<CaseLetter> {
        self.case_letter
    }

    pub(crate) fn set_case_letter(&mut self, case_letter: Option<CaseLetter>) {
        self.case_letter = case_letter;
    }

    pub fn potential(&self) -> i64 {
        self.potential
    }

    pub(crate) fn set_potential(&mut self, potential: i64) {
        self.potential = potential;
    }
}
