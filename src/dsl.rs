use crate::error::ConfigError;
use crate::ops::Connective;
use crate::rules::{Rule, RuleCondition};
use crate::variable::SetRef;

/// Fluent construction of a [`Rule`].
///
/// ```
/// use mamdani_fis::RuleBuilder;
///
/// let rule = RuleBuilder::new("FanSpeed", "High")
///     .when("Temperature", "Hot")
///     .when_not("Humidity", "Dry")
///     .or()
///     .weight(0.8)
///     .build()
///     .unwrap();
///
/// assert_eq!(rule.conditions().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct RuleBuilder {
    output: RuleCondition,
    connective: Connective,
    conditions: Vec<RuleCondition>,
    weight: f64,
}

impl RuleBuilder {
    pub fn new(variable: impl Into<String>, set: impl Into<String>) -> Self {
        RuleBuilder {
            output: RuleCondition::new(variable, set),
            connective: Connective::And,
            conditions: Vec::new(),
            weight: 1.,
        }
    }

    pub fn from_ref(output: &SetRef) -> Self {
        Self::new(output.variable.clone(), output.set.clone())
    }

    pub fn when(mut self, variable: impl Into<String>, set: impl Into<String>) -> Self {
        self.conditions.push(RuleCondition::new(variable, set));
        self
    }

    pub fn when_not(mut self, variable: impl Into<String>, set: impl Into<String>) -> Self {
        self.conditions.push(RuleCondition::not(variable, set));
        self
    }

    pub fn when_ref(mut self, set_ref: &SetRef) -> Self {
        self.conditions.push(set_ref.into());
        self
    }

    pub fn when_not_ref(self, set_ref: &SetRef) -> Self {
        self.when_not(set_ref.variable.clone(), set_ref.set.clone())
    }

    pub fn and(mut self) -> Self {
        self.connective = Connective::And;
        self
    }

    pub fn or(mut self) -> Self {
        self.connective = Connective::Or;
        self
    }

    /// Checked by [`build`](Self::build).
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn build(self) -> Result<Rule, ConfigError> {
        let mut rule = Rule::new(self.output, self.connective)?;

        for condition in self.conditions {
            rule.add_condition(condition)?;
        }
        rule.set_weight(self.weight)?;

        Ok(rule)
    }
}

impl SetRef {
    /// Starts a rule concluding this set.
    pub fn then(&self) -> RuleBuilder {
        RuleBuilder::from_ref(self)
    }
}
