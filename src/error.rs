use thiserror::Error;

use crate::variable::VariableKind;

/// Reported by an operator when one of its inputs was outside `[0, 1]`.
///
/// Carries the first offending value, before clamping.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("membership degree {value:.4} is outside [0, 1]")]
pub struct InvalidMembershipDegree {
    pub value: f64,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum MembershipError {
    #[error("triangular parameters must satisfy a <= b <= c, got a={a:.2}, b={b:.2}, c={c:.2}")]
    Triangular { a: f64, b: f64, c: f64 },
    #[error("trapezoidal parameters must satisfy a <= b <= c <= d, got a={a:.2}, b={b:.2}, c={c:.2}, d={d:.2}")]
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    #[error("gaussian width must be > 0, got {0:.2}")]
    GaussianWidth(f64),
    #[error("membership function parameters must be finite")]
    NonFinite,
}

/// Rejected configuration. Whatever was being configured is left untouched.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),
    #[error("domain minimum ({min:.2}) must be less than maximum ({max:.2})")]
    InvalidDomain { min: f64, max: f64 },
    #[error("set '{set}' already exists in variable '{variable}'")]
    DuplicateSet { variable: String, set: String },
    #[error("{kind} variable '{name}' already exists")]
    DuplicateVariable { kind: VariableKind, name: String },
    #[error("{kind} variable '{name}' does not exist")]
    UnknownVariable { kind: VariableKind, name: String },
    #[error("rule weight must be in range [0, 1], got {0:.2}")]
    InvalidWeight(f64),
    #[error("resolution must be > 0, got {0}")]
    InvalidResolution(usize),
    #[error("invalid defuzzification method '{0}': must be one of: centroid, mom, fom, lom, som")]
    UnknownDefuzzificationMethod(String),
    #[error("output condition cannot be negated: negation is only valid for input conditions")]
    NegatedConsequent,
    #[error(transparent)]
    Membership(#[from] MembershipError),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum RuleError {
    #[error("rule must have at least one condition")]
    NoConditions,
    #[error("rule references non-existent output variable '{0}'")]
    UnknownOutputVariable(String),
    #[error("rule references non-existent output set '{set}' in variable '{variable}'")]
    UnknownOutputSet { variable: String, set: String },
    #[error("rule condition {index} references non-existent input variable '{variable}'")]
    UnknownInputVariable { index: usize, variable: String },
    #[error("rule condition {index} references non-existent input set '{set}' in variable '{variable}'")]
    UnknownInputSet { index: usize, variable: String, set: String },
    #[error("error applying operator for rule output '{variable}.{set}': {source}")]
    InvalidMembership {
        variable: String,
        set: String,
        #[source]
        source: InvalidMembershipDegree,
    },
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DefuzzError {
    #[error("no rules fired: all membership degrees are zero")]
    NoRuleFired,
}

/// Failure of a whole [`infer`](crate::InferenceEngine::infer) call. No outputs are produced.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InferenceError {
    #[error("inference system has no input variables")]
    NoInputVariables,
    #[error("inference system has no output variables")]
    NoOutputVariables,
    #[error("inference system has no rules")]
    NoRules,
    #[error("missing required input variable: {0}")]
    MissingInput(String),
    #[error("input value {value:.2} for variable '{variable}' is out of bounds [{min:.2}, {max:.2}]")]
    OutOfBounds { variable: String, value: f64, min: f64, max: f64 },
    #[error("error evaluating rule: {0}")]
    Rule(#[from] RuleError),
    #[error("defuzzification failed for variable '{variable}': {source}")]
    Defuzzification {
        variable: String,
        #[source]
        source: DefuzzError,
    },
}
