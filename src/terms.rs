use crate::error::ConfigError;
use crate::membership::MembershipFunction;

/// A linguistic term: a named membership function, such as "Hot".
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzySet {
    name: String,
    function: MembershipFunction,
}

impl FuzzySet {
    pub fn new(name: impl Into<String>, function: MembershipFunction) -> Result<Self, ConfigError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ConfigError::EmptyName("fuzzy set"));
        }

        Ok(Self { name, function })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self) -> &MembershipFunction {
        &self.function
    }

    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.function.evaluate(x)
    }
}

#[test]
fn test_fuzzy_set() {
    let warm = FuzzySet::new("Warm", MembershipFunction::triangular(10., 25., 40.).unwrap()).unwrap();

    assert_eq!(warm.name(), "Warm");
    assert_eq!(warm.evaluate(25.), 1.);
    assert_eq!(warm.evaluate(40.), 0.);

    let err = FuzzySet::new("", MembershipFunction::gaussian(0., 1.).unwrap()).unwrap_err();

    assert_eq!(err, ConfigError::EmptyName("fuzzy set"));
    assert_eq!(err.to_string(), "fuzzy set name cannot be empty");
}
