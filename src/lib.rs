//! Mamdani fuzzy inference.
//!
//! Crisp inputs are fuzzified against the sets of their input variables,
//! rules combine those degrees with AND (min), OR (max) and NOT (complement),
//! the strongest rule per output set wins, and each output variable is
//! defuzzificated by sampling its domain.
//!
//! ```
//! use mamdani_fis::{FuzzySet, FuzzyVariable, Inputs, InferenceEngine, MembershipFunction, RuleBuilder};
//!
//! let mut temperature = FuzzyVariable::new("Temperature", 0., 50.).unwrap();
//! let cold = temperature
//!     .add_set(FuzzySet::new("Cold", MembershipFunction::triangular(0., 0., 25.).unwrap()).unwrap())
//!     .unwrap();
//! let hot = temperature
//!     .add_set(FuzzySet::new("Hot", MembershipFunction::triangular(25., 50., 50.).unwrap()).unwrap())
//!     .unwrap();
//!
//! let mut fan_speed = FuzzyVariable::new("FanSpeed", 0., 100.).unwrap();
//! let low = fan_speed
//!     .add_set(FuzzySet::new("Low", MembershipFunction::triangular(0., 0., 50.).unwrap()).unwrap())
//!     .unwrap();
//! let high = fan_speed
//!     .add_set(FuzzySet::new("High", MembershipFunction::triangular(50., 100., 100.).unwrap()).unwrap())
//!     .unwrap();
//!
//! let mut engine = InferenceEngine::new();
//!
//! engine.add_input_variable(temperature).unwrap();
//! engine.add_output_variable(fan_speed).unwrap();
//! engine.add_rule(low.then().when_ref(&cold).build().unwrap()).unwrap();
//! engine.add_rule(RuleBuilder::from_ref(&high).when_ref(&hot).build().unwrap()).unwrap();
//!
//! let outputs = engine.infer(&Inputs::from([("Temperature", 45.)])).unwrap();
//!
//! assert!(outputs.get("FanSpeed").unwrap() > 50.);
//! ```

mod config;
mod dsl;
mod error;
pub mod fis;
mod inference;
mod inputs;
mod linspace;
mod membership;
mod ops;
mod outputs;
mod rules;
mod terms;
mod variable;

pub use config::{EngineConfig, DEFAULT_RESOLUTION};
pub use dsl::RuleBuilder;
pub use error::{
    ConfigError, DefuzzError, InferenceError, InvalidMembershipDegree, MembershipError, RuleError,
};
pub use inference::InferenceEngine;
pub use inputs::Inputs;
pub use membership::{MembershipFunction, Shape};
pub use ops::{Connective, DefuzzificationMethod, Operator, OperatorOutput, EPSILON};
pub use outputs::Outputs;
pub use rules::{Memberships, Rule, RuleCondition};
pub use terms::FuzzySet;
pub use variable::{FuzzyVariable, SetRef, VariableKind};
