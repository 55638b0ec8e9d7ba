use std::fmt::Debug;

use super::NodeId;

/// The origin of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// A constraint given with the network.
    #[default]
    Ordinary,
    /// One of the two edges of a contingent link.
    Contingent,
    /// Added by propagation.
    Derived,
    /// Added by a checker while initialising the network.
    Internal,
}

/// The payload of an edge of a [`TemporalGraph`](super::TemporalGraph).
pub trait EdgeData: Clone + Debug {
    fn kind(&self) -> ConstraintKind;

    fn set_kind(&mut self, kind: ConstraintKind);

    /// Whether the edge constrains nothing.
    fn is_empty(&self) -> bool;

    /// Called when the node stored at `from` is moved to `to` because another node was removed.
    fn node_moved(&mut self, _from: NodeId, _to: NodeId) {}
}
