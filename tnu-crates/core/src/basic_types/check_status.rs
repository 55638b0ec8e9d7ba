use std::fmt::Display;
use std::fmt::Formatter;
use std::time::Duration;

use enum_map::EnumMap;

use super::PropagationRule;
use crate::create_statistics_struct;
use crate::labels::Label;
use crate::math::extended_int::ExtendedInt;
use crate::statistics::log_statistic;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The outcome of a check, derived from a [`CheckStatus`].
///
/// For the checkers of networks with contingent links, [`CheckOutcome::Consistent`] means that
/// the network is dynamically controllable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Consistent,
    Inconsistent,
    Timeout,
    CycleBoundExceeded,
    /// The check did not run to completion for another reason.
    NotFinished,
}

/// A loop with a negative value which holds in at least one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeLoop {
    /// The name of the node on the loop.
    pub node: String,
    pub label: Label,
    pub value: i32,
}

impl Display for NegativeLoop {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}→{} ({}, {})",
            self.node,
            self.node,
            self.label,
            ExtendedInt(self.value)
        )
    }
}

create_statistics_struct!(
    /// Statistics of the STNU checker.
    StnuStatistics {
        /// The number of full Bellman-Ford computations of the potential
        bellman_ford_runs: u64,
        /// The number of back-propagations started from a contingent node
        back_propagations: u64,
        /// The number of back-propagations which were restarted after another contingent link
        /// was processed first
        restarted_back_propagations: u64,
        /// The number of ordinary edges added or tightened
        derived_edges: u64,
        /// The number of incremental updates of the potential
        potential_updates: u64,
        /// The number of nodes added to bring the network into normal form
        normal_form_nodes: u64,
});

/// The result of one call of a checker.
#[derive(Debug, Clone, Default)]
pub struct CheckStatus {
    /// Whether the network is consistent (or controllable); only meaningful if `finished`.
    pub consistency: bool,
    pub finished: bool,
    pub timeout: bool,
    pub cycle_bound_exceeded: bool,
    /// The number of passes over the worklist.
    pub cycles: u64,
    pub rule_applications: EnumMap<PropagationRule, u64>,
    pub execution_time: Duration,
    /// The loop which proved the network inconsistent, if one was found.
    pub negative_loop: Option<NegativeLoop>,
    /// The well-definedness fixes applied during initialisation.
    pub fixes: Vec<String>,
    pub stnu: StnuStatistics,
}

impl CheckStatus {
    pub fn outcome(&self) -> CheckOutcome {
        if self.timeout {
            CheckOutcome::Timeout
        } else if self.cycle_bound_exceeded {
            CheckOutcome::CycleBoundExceeded
        } else if !self.finished {
            CheckOutcome::NotFinished
        } else if self.consistency {
            CheckOutcome::Consistent
        } else {
            CheckOutcome::Inconsistent
        }
    }

    /// Whether the check finished and found the network consistent (or controllable).
    pub fn is_consistent(&self) -> bool {
        self.outcome() == CheckOutcome::Consistent
    }

    pub fn total_rule_applications(&self) -> u64 {
        self.rule_applications.values().sum()
    }

    pub(crate) fn record_rule(&mut self, rule: PropagationRule) {
        self.rule_applications[rule] += 1;
    }

    /// Adds the cycles and rule applications of `other` to the counters of this status.
    pub(crate) fn add_counters(&mut self, other: &CheckStatus) {
        self.cycles += other.cycles;
        for (rule, applications) in other.rule_applications.iter() {
            self.rule_applications[rule] += applications;
        }
    }

    pub(crate) fn set_inconsistent(&mut self, negative_loop: Option<NegativeLoop>) {
        self.consistency = false;
        self.finished = true;
        self.negative_loop = negative_loop;
    }

    pub(crate) fn set_consistent(&mut self) {
        self.consistency = true;
        self.finished = true;
    }

    pub(crate) fn set_timeout(&mut self) {
        self.finished = false;
        self.timeout = true;
    }

    pub(crate) fn set_cycle_bound_exceeded(&mut self) {
        self.finished = false;
        self.cycle_bound_exceeded = true;
    }

    /// Logs the statistics of this status if statistic logging has been configured.
    pub fn log_statistics(&self) {
        if !should_log_statistics() {
            return;
        }

        log_statistic("outcome", format!("{:?}", self.outcome()));
        log_statistic("cycles", self.cycles);
        log_statistic("executionTime", self.execution_time.as_secs_f64());
        log_statistic("fixes", self.fixes.len());
        for (rule, applications) in self.rule_applications.iter() {
            log_statistic(format!("rule{rule}"), applications);
        }
        self.stnu.log(StatisticLogger::new(["stnu"]));
        log_statistic_postfix();
    }
}

impl Display for CheckStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} after {} cycles and {} rule applications in {:?}",
            self.outcome(),
            self.cycles,
            self.total_rule_applications(),
            self.execution_time
        )?;
        if let Some(negative_loop) = &self.negative_loop {
            write!(f, "; negative loop {negative_loop}")?;
        }
        Ok(())
    }
}
