use thiserror::Error;

use crate::labels::Proposition;

/// The errors which abort a check.
///
/// A network which is inconsistent, or not controllable, is an answer and not an error; such
/// outcomes are reported through [`CheckStatus`](crate::CheckStatus).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticRangeError),
}

/// A well-definedness violation of the network which cannot be fixed automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("the label of observer '{node}' contains its own proposition '{proposition}'")]
    ObserverLabelContainsOwnProposition {
        node: String,
        proposition: Proposition,
    },
    #[error("proposition '{proposition}' is observed by both '{first}' and '{second}'")]
    DuplicateObserver {
        proposition: Proposition,
        first: String,
        second: String,
    },
    #[error("'{element}' uses proposition '{proposition}' which has no observer")]
    UnobservedProposition {
        element: String,
        proposition: Proposition,
    },
    #[error("the label of node '{node}' contradicts the labels of its observers")]
    InconsistentNodeLabel { node: String },
    #[error("contingent edge '{edge}' has no contingent companion edge")]
    MissingCompanion { edge: String },
    #[error("contingent edge '{edge}' has no value")]
    EmptyContingentEdge { edge: String },
    #[error("the contingent link of '{contingent}' has a zero bound")]
    ZeroContingentBound { contingent: String },
    #[error("the contingent link of '{contingent}' has the invalid range [{lower}, {upper}]")]
    InvalidContingentRange {
        contingent: String,
        lower: i32,
        upper: i32,
    },
    #[error("edge '{edge}' stores a case value which contradicts its contingent link")]
    ContradictoryCaseValues { edge: String },
    #[error("contingent node '{contingent}' is activated by both '{first}' and '{second}'")]
    MultipleActivations {
        contingent: String,
        first: String,
        second: String,
    },
    #[error("edge '{edge}' is contingent, which is not supported by this checker")]
    UnsupportedContingentEdge { edge: String },
    #[error("the network has more than {maximum} contingent nodes")]
    TooManyContingentNodes { maximum: usize },
}

/// A value of the network, or the horizon derived from it, does not fit in the finite range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticRangeError {
    #[error("the sum of {lhs} and {rhs} is not representable")]
    SumOverflow { lhs: i32, rhs: i32 },
    #[error("the horizon {max_weight} * {node_count} is not representable")]
    HorizonOverflow { max_weight: i64, node_count: usize },
    #[error("the derived weight {value} is not representable")]
    WeightOverflow { value: i64 },
}
