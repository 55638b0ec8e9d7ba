//! The graph store shared by all checkers.
//!
//! A [`TemporalGraph`] owns its nodes and edges; the payload of an edge is generic so the
//! conditional checkers ([`LabeledEdge`]) and the STNU checker ([`StnuEdge`]) share one store.
mod adjacency_matrix;
mod edge;
mod ids;
mod labeled_edge;
mod node;
mod stnu_edge;
mod temporal_graph;

pub use edge::*;
pub use ids::*;
pub use labeled_edge::*;
pub use node::*;
pub use stnu_edge::*;
pub use temporal_graph::*;

/// The graph of conditional networks, with or without contingent links.
pub type LabeledGraph = TemporalGraph<LabeledEdge>;
/// The graph of networks with contingent links and without propositions.
pub type StnuGraph = TemporalGraph<StnuEdge>;
