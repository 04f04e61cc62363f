use std::collections::HashMap;

use crate::inputs::FactKind;
use crate::variable::{Variable, VariableKey};

/// Intermediate memberships of one rule during one evaluation, kept for
/// inspection and plotting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleTrace {
    pub(crate) modified_premise_memberships: HashMap<VariableKey, Vec<f64>>,
    pub(crate) modified_consequence_memberships: HashMap<VariableKey, Vec<f64>>,
    pub(crate) combined_compositions: HashMap<VariableKey, Vec<f64>>,
    pub(crate) inferred_cf: f64,
    pub(crate) fired: bool,
}

impl RuleTrace {
    /// The hedged term membership the rule uses for a premise variable
    pub fn modified_premise_membership<I>(&self, var: Variable<I>) -> Option<&[f64]> {
        self.modified_premise_memberships.get(&var.0).map(Vec::as_slice)
    }

    pub fn modified_consequence_membership<I>(&self, var: Variable<I>) -> Option<&[f64]> {
        self.modified_consequence_memberships.get(&var.0).map(Vec::as_slice)
    }

    /// What this rule infers for an output variable, before aggregation
    pub fn combined_composition<I>(&self, var: Variable<I>) -> Option<&[f64]> {
        self.combined_compositions.get(&var.0).map(Vec::as_slice)
    }

    pub fn inferred_cf(&self) -> f64 {
        self.inferred_cf
    }

    /// Whether the inferred CF reached the rule's threshold
    pub fn fired(&self) -> bool {
        self.fired
    }
}

#[derive(Clone, Debug, Default)]
pub struct Outputs {
    pub(crate) defuzzificated_inferred_memberships: HashMap<VariableKey, f64>,
    pub(crate) aggregated_memberships: HashMap<VariableKey, Vec<f64>>,
    pub(crate) fact_memberships: HashMap<VariableKey, (FactKind, Vec<f64>)>,
    pub(crate) rule_traces: Vec<RuleTrace>,
    pub(crate) inferred_cf: f64,
}

impl Outputs {
    /// The crisp value inferred for an output variable
    pub fn get_inferred_membership<I>(&self, var: Variable<I>) -> Option<f64> {
        self.defuzzificated_inferred_memberships.get(&var.0).copied()
    }

    /// The aggregated fuzzy conclusion, aligned with the variable's universe
    pub fn aggregated_membership<I>(&self, var: Variable<I>) -> Option<&[f64]> {
        self.aggregated_memberships.get(&var.0).map(Vec::as_slice)
    }

    /// An input fact after fuzzification
    pub fn fact_membership<I>(&self, var: Variable<I>) -> Option<&[f64]> {
        self.fact_memberships.get(&var.0).map(|(_, membership)| membership.as_slice())
    }

    pub fn fact_kind<I>(&self, var: Variable<I>) -> Option<FactKind> {
        self.fact_memberships.get(&var.0).map(|(kind, _)| *kind)
    }

    /// Per rule, in rule order
    pub fn rule_traces(&self) -> &[RuleTrace] {
        &self.rule_traces
    }

    pub fn rule_trace(&self, index: usize) -> Option<&RuleTrace> {
        self.rule_traces.get(index)
    }

    /// Largest inferred certainty factor over all rules
    pub fn inferred_cf(&self) -> f64 {
        self.inferred_cf
    }
}
