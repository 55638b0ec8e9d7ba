//! # tnu-checker
//! Checks whether temporal networks can be executed in every situation they may encounter.
//!
//! Three kinds of networks are supported:
//! * Conditional simple temporal networks (CSTN), whose constraints depend on propositions which
//!   are observed while the network executes. [`CstnChecker`] decides whether they are
//!   _dynamically consistent_.
//! * Simple temporal networks with uncertainty (STNU), where some durations are chosen by the
//!   environment. [`StnuChecker`] decides whether they are _dynamically controllable_.
//! * The combination of both (CSTNU), handled by [`CstnuChecker`].
//!
//! # Building a network
//! A network is a [`graph::TemporalGraph`] of named nodes. An edge `X → Y` with value `v`
//! states that `Y` occurs at most `v` after `X`; the values of conditional networks are
//! qualified by a [`labels::Label`]:
//! ```rust
//! # use tnu_checker::graph::LabeledEdge;
//! # use tnu_checker::graph::LabeledGraph;
//! # use tnu_checker::graph::Node;
//! # use tnu_checker::labels::Label;
//! # use tnu_checker::labels::Proposition;
//! let p = Proposition::from_char('p').unwrap();
//!
//! let mut graph = LabeledGraph::new();
//! let _ = graph.add_node(Node::new("Z"));
//! let _ = graph.add_node(Node::new("P?").observing(p));
//! let _ = graph.add_node(Node::new("X"));
//!
//! // The truth value of `p` is known at time 5
//! let _ = graph.add_edge("ZP", LabeledEdge::ordinary(Label::EMPTY, 5), "Z", "P?");
//! let _ = graph.add_edge("PZ", LabeledEdge::ordinary(Label::EMPTY, -5), "P?", "Z");
//!
//! // `X` occurs at 10 if `p` holds, and at 6 otherwise
//! let in_scenario = |label: &str| label.parse::<Label>().unwrap();
//! let _ = graph.add_edge(
//!     "ZX",
//!     LabeledEdge::ordinary(in_scenario("p"), 10).with_value(in_scenario("¬p"), 6),
//!     "Z",
//!     "X",
//! );
//! let _ = graph.add_edge(
//!     "XZ",
//!     LabeledEdge::ordinary(in_scenario("p"), -10).with_value(in_scenario("¬p"), -6),
//!     "X",
//!     "Z",
//! );
//! ```
//!
//! # Checking a network
//! A checker takes ownership of the network, and adds the constraints it derives to it. The
//! verdict is part of the returned [`CheckStatus`]:
//! ```rust
//! # use tnu_checker::graph::LabeledEdge;
//! # use tnu_checker::graph::LabeledGraph;
//! # use tnu_checker::graph::Node;
//! # use tnu_checker::labels::Label;
//! # use tnu_checker::labels::Proposition;
//! # use tnu_checker::CheckOutcome;
//! # use tnu_checker::CheckerOptions;
//! # use tnu_checker::CstnChecker;
//! # let p = Proposition::from_char('p').unwrap();
//! # let mut graph = LabeledGraph::new();
//! # let _ = graph.add_node(Node::new("Z"));
//! # let _ = graph.add_node(Node::new("P?").observing(p));
//! # let _ = graph.add_node(Node::new("X"));
//! # let _ = graph.add_edge("ZP", LabeledEdge::ordinary(Label::EMPTY, 5), "Z", "P?");
//! # let _ = graph.add_edge("PZ", LabeledEdge::ordinary(Label::EMPTY, -5), "P?", "Z");
//! # let in_scenario = |label: &str| label.parse::<Label>().unwrap();
//! # let _ = graph.add_edge(
//! #     "ZX",
//! #     LabeledEdge::ordinary(in_scenario("p"), 10).with_value(in_scenario("¬p"), 6),
//! #     "Z",
//! #     "X",
//! # );
//! # let _ = graph.add_edge(
//! #     "XZ",
//! #     LabeledEdge::ordinary(in_scenario("p"), -10).with_value(in_scenario("¬p"), -6),
//! #     "X",
//! #     "Z",
//! # );
//! let mut checker = CstnChecker::new(graph, CheckerOptions::default());
//! let status = checker.init_and_check().expect("the network is well-defined");
//!
//! // Both scenarios are decided after `p` is observed
//! assert_eq!(CheckOutcome::Consistent, status.outcome());
//! ```
//!
//! A network which cannot be checked, for example because a contingent link lacks one of its
//! edges, results in a [`CheckError`]. A network which is inconsistent is not an error: its
//! [`CheckStatus`] reports [`CheckOutcome::Inconsistent`], together with the negative loop which
//! was found when there is one.
//!
//! # Options
//! The behaviour of the checkers is configured through [`CheckerOptions`]; among others, it sets
//! the time budget of a check and the [`StnuAlgorithm`] used by the [`StnuChecker`]. A check can
//! also be given any [`termination::TerminationCondition`] directly, as in
//! [`CstnChecker::dynamic_consistency_check`].
pub use tnu_core::*;
