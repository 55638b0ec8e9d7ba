use std::fmt::Debug;

use enumset::enum_set;
use enumset::EnumSet;

use crate::basic_types::PropagationRule;

/// The rules a conditional checker applies.
pub trait RuleSet: Debug {
    fn enabled_rules(&self) -> EnumSet<PropagationRule>;
}

/// Labeled propagation together with every observation rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullRuleSet;

impl RuleSet for FullRuleSet {
    fn enabled_rules(&self) -> EnumSet<PropagationRule> {
        enum_set!(
            PropagationRule::LabelPropagation
                | PropagationRule::R0
                | PropagationRule::QR0
                | PropagationRule::R3
                | PropagationRule::QR3
        )
    }
}

/// Labeled propagation together with the observation rules for edges ending in Z only.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestrictedRuleSet;

impl RuleSet for RestrictedRuleSet {
    fn enabled_rules(&self) -> EnumSet<PropagationRule> {
        enum_set!(PropagationRule::LabelPropagation | PropagationRule::QR0 | PropagationRule::QR3)
    }
}
