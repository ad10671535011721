use std::collections::HashMap;

use slotmap::SecondaryMap;

use crate::error::{ConfigError, RuleError};
use crate::ops::Connective;
use crate::variable::{SetKey, SetRef, VariableKey};

/// Membership degrees by variable name, then set name.
pub type Memberships = HashMap<String, HashMap<String, f64>>;

/// Fuzzified inputs as held by an engine.
pub(crate) type KeyedMemberships = SecondaryMap<VariableKey, SecondaryMap<SetKey, f64>>;

/// "`variable` is (not) `set`"
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RuleCondition {
    pub variable: String,
    pub set: String,
    pub negated: bool,
}

impl RuleCondition {
    pub fn new(variable: impl Into<String>, set: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            set: set.into(),
            negated: false,
        }
    }

    pub fn not(variable: impl Into<String>, set: impl Into<String>) -> Self {
        Self {
            negated: true,
            ..Self::new(variable, set)
        }
    }
}

impl From<&SetRef> for RuleCondition {
    fn from(set_ref: &SetRef) -> Self {
        Self::new(set_ref.variable.clone(), set_ref.set.clone())
    }
}

/// IF conditions THEN output, with a weight applied to the firing strength.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    conditions: Vec<RuleCondition>,
    output: RuleCondition,
    weight: f64,
    connective: Connective,
}

impl Rule {
    /// A rule with no conditions yet and a weight of 1.
    pub fn new(output: RuleCondition, connective: Connective) -> Result<Self, ConfigError> {
        if output.variable.is_empty() {
            return Err(ConfigError::EmptyName("output variable"));
        }
        if output.set.is_empty() {
            return Err(ConfigError::EmptyName("output set"));
        }
        if output.negated {
            return Err(ConfigError::NegatedConsequent);
        }

        Ok(Self {
            conditions: Vec::new(),
            output,
            weight: 1.,
            connective,
        })
    }

    pub fn add_condition(&mut self, condition: RuleCondition) -> Result<(), ConfigError> {
        if condition.variable.is_empty() {
            return Err(ConfigError::EmptyName("condition variable"));
        }
        if condition.set.is_empty() {
            return Err(ConfigError::EmptyName("condition set"));
        }

        self.conditions.push(condition);

        Ok(())
    }

    pub fn set_weight(&mut self, weight: f64) -> Result<(), ConfigError> {
        if !(0. ..=1.).contains(&weight) {
            return Err(ConfigError::InvalidWeight(weight));
        }

        self.weight = weight;

        Ok(())
    }

    pub fn conditions(&self) -> &[RuleCondition] {
        &self.conditions
    }

    pub fn output(&self) -> &RuleCondition {
        &self.output
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn connective(&self) -> Connective {
        self.connective
    }

    /// Firing strength of this rule for the given degrees. Conditions on a
    /// variable or set missing from `memberships` contribute 0.
    pub fn evaluate(&self, memberships: &Memberships) -> Result<f64, RuleError> {
        self.fire(self.conditions.iter().map(|cond| {
            memberships
                .get(&cond.variable)
                .and_then(|sets| sets.get(&cond.set))
                .copied()
        }))
    }

    /// `degrees` yields the looked-up degree of each condition, in order.
    fn fire(&self, degrees: impl IntoIterator<Item = Option<f64>>) -> Result<f64, RuleError> {
        if self.conditions.is_empty() {
            return Err(RuleError::NoConditions);
        }

        let values: Vec<f64> = self
            .conditions
            .iter()
            .zip(degrees)
            .map(|(cond, degree)| match degree {
                Some(degree) if cond.negated => 1. - degree,
                Some(degree) => degree,
                None => 0.,
            })
            .collect();
        let combined = self
            .connective
            .operator()
            .apply(&values)
            .into_result()
            .map_err(|source| RuleError::InvalidMembership {
                variable: self.output.variable.clone(),
                set: self.output.set.clone(),
                source,
            })?;

        Ok(combined * self.weight)
    }
}

/// A registered rule with every name resolved to its engine handle.
#[derive(Clone, Debug)]
pub(crate) struct CompiledRule {
    pub(crate) rule: Rule,
    pub(crate) antecedents: Vec<(VariableKey, SetKey)>,
    pub(crate) consequent: (VariableKey, SetKey),
}

impl CompiledRule {
    pub(crate) fn fire(&self, memberships: &KeyedMemberships) -> Result<f64, RuleError> {
        self.rule.fire(
            self.antecedents
                .iter()
                .map(|&(var, set)| memberships.get(var).and_then(|sets| sets.get(set)).copied()),
        )
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Rules(pub(crate) Vec<CompiledRule>);

impl Rules {
    pub(crate) fn new() -> Self {
        Rules(Vec::new())
    }

    pub(crate) fn add(&mut self, rule: CompiledRule) {
        self.0.push(rule);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.0.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
