//! Shared set-up of the integration tests of the checkers.
#![allow(
    dead_code,
    reason = "every test binary uses a different part of the helpers"
)]

use tnu_checker::graph::LabeledEdge;
use tnu_checker::graph::LabeledGraph;
use tnu_checker::graph::Node;
use tnu_checker::graph::StnuEdge;
use tnu_checker::graph::StnuGraph;
use tnu_checker::labels::Label;
use tnu_checker::labels::Proposition;
use tnu_checker::termination::TerminationCondition;

/// Routes the log output of the checkers through the test harness.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn label(s: &str) -> Label {
    s.parse().unwrap()
}

pub(crate) fn proposition(c: char) -> Proposition {
    Proposition::from_char(c).unwrap()
}

/// A termination condition which stops every check at the first opportunity.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StopImmediately;

impl TerminationCondition for StopImmediately {
    fn should_stop(&mut self) -> bool {
        true
    }
}

/// The chain `Z → A → B` closed by `B → Z` with value `closing`.
pub(crate) fn triangle(closing: i32) -> LabeledGraph {
    let mut graph = LabeledGraph::new();
    for name in ["Z", "A", "B"] {
        let _ = graph.add_node(Node::new(name));
    }
    let _ = graph.add_edge("ZA", LabeledEdge::ordinary(Label::EMPTY, 0), "Z", "A");
    let _ = graph.add_edge("AB", LabeledEdge::ordinary(Label::EMPTY, 0), "A", "B");
    let _ = graph.add_edge(
        "BZ",
        LabeledEdge::ordinary(Label::EMPTY, closing),
        "B",
        "Z",
    );
    graph
}

/// The contingent link `(A, 1, 3, C)`, with `A` starting at least 1 after `Z`.
pub(crate) fn stnu_with_link() -> StnuGraph {
    let mut graph = StnuGraph::new();
    for name in ["Z", "A", "C"] {
        let _ = graph.add_node(Node::new(name));
    }
    let _ = graph.add_edge("AZ", StnuEdge::ordinary(-1), "A", "Z");
    let _ = graph.add_edge("AC", StnuEdge::contingent(3), "A", "C");
    let _ = graph.add_edge("CA", StnuEdge::contingent(-1), "C", "A");
    graph
}
