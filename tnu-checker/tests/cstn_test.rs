#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use helpers::init_logging;
use helpers::label;
use helpers::proposition;
use helpers::triangle;
use helpers::StopImmediately;
use tnu_checker::graph::EdgeData;
use tnu_checker::graph::LabeledEdge;
use tnu_checker::graph::LabeledGraph;
use tnu_checker::graph::Node;
use tnu_checker::labels::Label;
use tnu_checker::CheckOutcome;
use tnu_checker::CheckerOptions;
use tnu_checker::CheckerState;
use tnu_checker::CstnChecker;
use tnu_checker::RestrictedRuleSet;

mod helpers;

#[test]
fn a_negative_cycle_is_inconsistent() {
    init_logging();
    let mut checker = CstnChecker::new(triangle(-1), CheckerOptions::default());

    let status = checker.init_and_check().unwrap();

    assert_eq!(CheckOutcome::Inconsistent, status.outcome());
    let negative_loop = status.negative_loop.expect("a negative loop is reported");
    assert!(negative_loop.value < 0);
}

#[test]
fn a_non_negative_cycle_is_consistent() {
    init_logging();
    let mut checker = CstnChecker::new(triangle(1), CheckerOptions::default());

    let status = checker.init_and_check().unwrap();

    assert_eq!(CheckOutcome::Consistent, status.outcome());
    let graph = checker.graph();
    let z = graph.find_node("Z").unwrap();
    let b = graph.find_node("B").unwrap();
    let zb = graph.find_edge(z, b).unwrap();
    assert_eq!(Some(0), graph.edge(zb).min_value());
    for node in graph.nodes() {
        if let Some(self_loop) = graph.find_edge(node, node) {
            assert!(graph.edge(self_loop).min_value().unwrap_or(0) >= 0);
        }
    }
}

#[test]
fn an_observed_proposition_is_removed_from_a_non_positive_value() {
    init_logging();
    let mut graph = LabeledGraph::new();
    let _ = graph.add_node(Node::new("Z"));
    let _ = graph.add_node(Node::new("P?").observing(proposition('p')));
    let _ = graph.add_node(Node::new("X"));
    let _ = graph.add_edge("PX", LabeledEdge::ordinary(label("p"), -2), "P?", "X");
    let mut checker = CstnChecker::new(graph, CheckerOptions::default());

    let status = checker.init_and_check().unwrap();

    assert_eq!(CheckOutcome::Consistent, status.outcome());
    let graph = checker.graph();
    let p = graph.find_node("P?").unwrap();
    let x = graph.find_node("X").unwrap();
    let px = graph.find_edge(p, x).unwrap();
    assert_eq!(Some(-2), graph.edge(px).values().get(Label::EMPTY));
}

#[test]
fn the_restricted_rule_set_agrees_on_a_scenario_dependent_network() {
    init_logging();
    let scenario_network = || {
        let mut graph = LabeledGraph::new();
        let _ = graph.add_node(Node::new("Z"));
        let _ = graph.add_node(Node::new("P?").observing(proposition('p')));
        let _ = graph.add_node(Node::new("X"));
        let _ = graph.add_edge("ZP", LabeledEdge::ordinary(Label::EMPTY, 3), "Z", "P?");
        let _ = graph.add_edge("PZ", LabeledEdge::ordinary(Label::EMPTY, -3), "P?", "Z");
        let _ = graph.add_edge(
            "XZ",
            LabeledEdge::ordinary(label("p"), -6).with_value(label("¬p"), -4),
            "X",
            "Z",
        );
        let _ = graph.add_edge("ZX", LabeledEdge::ordinary(Label::EMPTY, 6), "Z", "X");
        graph
    };

    let full = CstnChecker::new(scenario_network(), CheckerOptions::default())
        .init_and_check()
        .unwrap();
    let restricted = CstnChecker::with_rule_set(
        scenario_network(),
        CheckerOptions::default().propagating_only_to_z(),
        RestrictedRuleSet,
    )
    .init_and_check()
    .unwrap();

    assert_eq!(CheckOutcome::Consistent, full.outcome());
    assert_eq!(full.outcome(), restricted.outcome());
}

#[test]
fn a_check_which_is_stopped_reports_a_timeout() {
    init_logging();
    let mut checker = CstnChecker::new(triangle(1), CheckerOptions::default());

    let status = checker
        .dynamic_consistency_check(&mut StopImmediately)
        .unwrap();

    assert_eq!(CheckOutcome::Timeout, status.outcome());
    assert_eq!(CheckerState::Finished(CheckOutcome::Timeout), checker.state());
}

#[test]
fn the_cleaned_graph_keeps_only_the_constraints() {
    init_logging();
    let mut checker = CstnChecker::new(triangle(1), CheckerOptions::default());
    let _ = checker.init_and_check().unwrap();

    let cleaned = checker.graph_cleaned();

    assert!(cleaned.edges().all(|edge| !cleaned.edge(edge).is_empty()));
    assert!(cleaned.edges().all(|edge| {
        let (source, target) = cleaned.endpoints(edge);
        source != target
    }));
}
