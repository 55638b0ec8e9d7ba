use std::fmt::Display;
use std::fmt::Formatter;
use std::time::Duration;

use super::termination::TimeBudget;

/// The algorithm used by the [`StnuChecker`](crate::StnuChecker).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StnuAlgorithm {
    /// Normal form followed by a recursive back-propagation from every node with a negative
    /// incoming edge.
    Morris2014,
    /// Back-propagation per contingent link, resolving dependencies between links by recursion
    /// and recomputing the potential after each link.
    Rul2018,
    /// Back-propagation per contingent link with an explicit stack of links and an incremental
    /// update of the potential.
    #[default]
    Rul2020,
}

impl Display for StnuAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StnuAlgorithm::Morris2014 => write!(f, "Morris2014"),
            StnuAlgorithm::Rul2018 => write!(f, "RUL2018"),
            StnuAlgorithm::Rul2020 => write!(f, "RUL2020"),
        }
    }
}

/// The options recognised by the checkers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerOptions {
    /// The wall-clock budget of one check; `None` lets a check run until it finishes.
    pub timeout: Option<Duration>,
    /// Only derive values on edges ending in Z.
    pub propagate_only_to_z: bool,
    /// Whether node labels are taken into account.
    pub with_node_labels: bool,
    pub stnu_algorithm: StnuAlgorithm,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            timeout: Some(Duration::from_secs(2700)),
            propagate_only_to_z: false,
            with_node_labels: true,
            stnu_algorithm: StnuAlgorithm::default(),
        }
    }
}

impl CheckerOptions {
    pub fn timeout_after(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn propagating_only_to_z(mut self) -> Self {
        self.propagate_only_to_z = true;
        self
    }

    pub fn without_node_labels(mut self) -> Self {
        self.with_node_labels = false;
        self
    }

    pub fn using(mut self, stnu_algorithm: StnuAlgorithm) -> Self {
        self.stnu_algorithm = stnu_algorithm;
        self
    }

    /// The termination condition of a check which starts now.
    pub(crate) fn termination(&self) -> Option<TimeBudget> {
        self.timeout.map(TimeBudget::starting_now)
    }
}
