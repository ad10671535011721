//! Loading of inference systems from the `.fis` text format.
//!
//! ```text
//! [System]
//! Name='FanControl'
//! Type='mamdani'
//! DefuzzMethod='centroid'
//!
//! [Input1]
//! Name='Temperature'
//! Range=[0 50]
//! MF1='Cold':'trimf',[0 0 25]
//! MF2='Hot':'trimf',[25 50 50]
//!
//! [Output1]
//! Name='FanSpeed'
//! Range=[0 100]
//! MF1='Low':'trimf',[0 0 50]
//! MF2='High':'trimf',[50 100 100]
//!
//! [Rules]
//! 1, 1 (1) : 1
//! 2, 2 (1) : 1
//! ```

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::error::{ConfigError, MembershipError, RuleError};
use crate::inference::InferenceEngine;
use crate::variable::VariableKind;

mod converter;
mod model;
mod parser;

pub use self::converter::convert;
pub use self::model::{FisModel, MembershipSpec, RuleSpec, SystemSection, VariableSection};
pub use self::parser::{parse_file, parse_str, ParseError};

#[derive(Debug, Error)]
pub enum FisError {
    #[error("failed to read FIS file: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: error parsing '{text}': {source}")]
    Parse {
        line: usize,
        text: String,
        #[source]
        source: ParseError,
    },
    #[error("only mamdani FIS supported, got: {0}")]
    UnsupportedSystem(String),
    #[error("error converting {kind} variable #{index} ('{name}'): {source}")]
    Variable {
        kind: VariableKind,
        index: usize,
        name: String,
        #[source]
        source: ConfigError,
    },
    #[error("error in membership function #{index} ('{name}') of variable '{variable}': {source}")]
    MembershipFunction {
        variable: String,
        index: usize,
        name: String,
        #[source]
        source: ShapeError,
    },
    #[error("error converting rule #{index}: {source}")]
    Rule {
        index: usize,
        #[source]
        source: RuleSpecError,
    },
}

/// A membership function line that doesn't describe a usable shape.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("{kind} requires {expected} parameters, got {got}")]
    ParamCount {
        kind: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("unsupported membership function type '{0}' (supported: trimf, trapmf, gaussmf)")]
    Unsupported(String),
    #[error("invalid parameters: {0}")]
    Invalid(#[from] MembershipError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A rule line that doesn't fit the variables it refers to.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RuleSpecError {
    #[error("rule must have at least one non-zero consequent")]
    NoConsequent,
    #[error("invalid output index in rule: set {set} of output {variable}")]
    OutputIndex { variable: usize, set: i64 },
    #[error("antecedent {position} exceeds number of inputs {inputs}")]
    AntecedentIndex { position: usize, inputs: usize },
    #[error("invalid MF index {index} for input '{variable}'")]
    SetIndex { index: i64, variable: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] RuleError),
}

/// Parses and converts a `.fis` file in one step.
pub fn load_file(path: impl AsRef<Path>) -> Result<InferenceEngine, FisError> {
    convert(&parse_file(path)?)
}
