use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::error::ConfigError;
use crate::terms::FuzzySet;

new_key_type! {
    /// A variable key
    pub(crate) struct VariableKey;

    /// A set key, only meaningful for the variable that issued it
    pub(crate) struct SetKey;
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum VariableKind {
    Input,
    Output,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Names a set inside a variable. Returned by [`FuzzyVariable::add_set`] so
/// rules can be built without repeating string literals.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SetRef {
    pub variable: String,
    pub set: String,
}

/// A linguistic variable: a numeric domain and the fuzzy sets covering it.
///
/// Sets can only be added. Once a name is taken it keeps its set for the
/// lifetime of the variable.
#[derive(Clone, Debug)]
pub struct FuzzyVariable {
    name: String,
    min: f64,
    max: f64,
    sets: SlotMap<SetKey, FuzzySet>,
    set_keys: HashMap<String, SetKey>,
}

impl FuzzyVariable {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Result<Self, ConfigError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ConfigError::EmptyName("variable"));
        }
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ConfigError::InvalidDomain { min, max });
        }

        Ok(Self {
            name,
            min,
            max,
            sets: SlotMap::with_key(),
            set_keys: HashMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn domain(&self) -> RangeInclusive<f64> {
        self.min..=self.max
    }

    /// Whether `value` lies in the domain, both ends included.
    pub fn contains(&self, value: f64) -> bool {
        self.domain().contains(&value)
    }

    pub fn add_set(&mut self, set: FuzzySet) -> Result<SetRef, ConfigError> {
        if self.set_keys.contains_key(set.name()) {
            return Err(ConfigError::DuplicateSet {
                variable: self.name.clone(),
                set: set.name().to_owned(),
            });
        }

        let set_ref = SetRef {
            variable: self.name.clone(),
            set: set.name().to_owned(),
        };
        let name = set.name().to_owned();
        let key = self.sets.insert(set);

        self.set_keys.insert(name, key);

        Ok(set_ref)
    }

    pub fn set(&self, name: &str) -> Option<&FuzzySet> {
        self.set_key(name).map(|key| &self.sets[key])
    }

    pub fn sets(&self) -> impl Iterator<Item = &FuzzySet> {
        self.sets.values()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Membership degree of `value` in every set, by set name.
    pub fn fuzzify(&self, value: f64) -> HashMap<String, f64> {
        self.sets
            .values()
            .map(|set| (set.name().to_owned(), set.evaluate(value)))
            .collect()
    }

    pub(crate) fn set_key(&self, name: &str) -> Option<SetKey> {
        self.set_keys.get(name).copied()
    }

    pub(crate) fn set_by_key(&self, key: SetKey) -> Option<&FuzzySet> {
        self.sets.get(key)
    }

    pub(crate) fn fuzzify_keyed(&self, value: f64) -> SecondaryMap<SetKey, f64> {
        self.sets.iter().map(|(key, set)| (key, set.evaluate(value))).collect()
    }
}

/// Name-indexed arena of the variables of one kind held by an engine.
#[derive(Clone, Debug)]
pub(crate) struct Variables {
    kind: VariableKind,
    arena: SlotMap<VariableKey, FuzzyVariable>,
    keys: HashMap<String, VariableKey>,
}

impl Variables {
    pub(crate) fn new(kind: VariableKind) -> Self {
        Self {
            kind,
            arena: SlotMap::with_key(),
            keys: HashMap::new(),
        }
    }

    pub(crate) fn add(&mut self, var: FuzzyVariable) -> Result<VariableKey, ConfigError> {
        if self.keys.contains_key(var.name()) {
            return Err(ConfigError::DuplicateVariable {
                kind: self.kind,
                name: var.name().to_owned(),
            });
        }

        let name = var.name().to_owned();
        let key = self.arena.insert(var);

        self.keys.insert(name, key);

        Ok(key)
    }

    pub(crate) fn key(&self, name: &str) -> Option<VariableKey> {
        self.keys.get(name).copied()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&FuzzyVariable> {
        self.key(name).map(|key| &self.arena[key])
    }

    /// Sets are the only thing that can change on a registered variable.
    pub(crate) fn add_set(&mut self, variable: &str, set: FuzzySet) -> Result<SetRef, ConfigError> {
        let var = self
            .key(variable)
            .and_then(|key| self.arena.get_mut(key))
            .ok_or_else(|| ConfigError::UnknownVariable {
                kind: self.kind,
                name: variable.to_owned(),
            })?;

        var.add_set(set)
    }

    pub(crate) fn by_key(&self, key: VariableKey) -> &FuzzyVariable {
        &self.arena[key]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (VariableKey, &FuzzyVariable)> {
        self.arena.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.arena.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::membership::MembershipFunction;

    fn tri(name: &str, a: f64, b: f64, c: f64) -> FuzzySet {
        FuzzySet::new(name, MembershipFunction::triangular(a, b, c).unwrap()).unwrap()
    }

    #[test]
    fn test_new_variable_validation() {
        assert!(FuzzyVariable::new("Temperature", 0., 50.).is_ok());
        assert_eq!(
            FuzzyVariable::new("", 0., 50.).unwrap_err(),
            ConfigError::EmptyName("variable")
        );
        assert_eq!(
            FuzzyVariable::new("Temperature", 50., 50.).unwrap_err(),
            ConfigError::InvalidDomain { min: 50., max: 50. }
        );
        assert!(FuzzyVariable::new("Temperature", 60., 50.).is_err());
        assert!(FuzzyVariable::new("Temperature", f64::NAN, 50.).is_err());
        assert!(FuzzyVariable::new("Temperature", 0., f64::INFINITY).is_err());
        assert_eq!(
            FuzzyVariable::new("Temperature", 60., 50.).unwrap_err().to_string(),
            "domain minimum (60.00) must be less than maximum (50.00)"
        );
    }

    #[test]
    fn test_add_set_returns_ref() {
        let mut temp = FuzzyVariable::new("Temperature", 0., 50.).unwrap();
        let hot = temp.add_set(tri("Hot", 30., 50., 50.)).unwrap();

        assert_eq!(
            hot,
            SetRef {
                variable: "Temperature".into(),
                set: "Hot".into()
            }
        );
        assert_eq!(temp.len(), 1);
        assert!(temp.set("Hot").is_some());
        assert!(temp.set("Cold").is_none());
    }

    #[test]
    fn test_duplicate_set_keeps_original() {
        let mut temp = FuzzyVariable::new("Temperature", 0., 50.).unwrap();

        temp.add_set(tri("Hot", 30., 50., 50.)).unwrap();

        let err = temp.add_set(tri("Hot", 0., 1., 2.)).unwrap_err();

        assert_eq!(err.to_string(), "set 'Hot' already exists in variable 'Temperature'");
        assert_eq!(temp.len(), 1);
        assert_relative_eq!(temp.set("Hot").unwrap().evaluate(40.), 0.5);
    }

    #[test]
    fn test_fuzzify() {
        let mut temp = FuzzyVariable::new("Temperature", 0., 50.).unwrap();

        temp.add_set(tri("Cold", 0., 0., 20.)).unwrap();
        temp.add_set(tri("Warm", 10., 25., 40.)).unwrap();
        temp.add_set(tri("Hot", 30., 50., 50.)).unwrap();

        let degrees = temp.fuzzify(15.);

        assert_eq!(degrees.len(), 3);
        assert_relative_eq!(degrees["Cold"], 0.25);
        assert_relative_eq!(degrees["Warm"], 1. / 3.);
        assert_eq!(degrees["Hot"], 0.);

        let keyed = temp.fuzzify_keyed(15.);
        let warm = temp.set_key("Warm").unwrap();

        assert_eq!(keyed.len(), 3);
        assert_eq!(keyed[warm], degrees["Warm"]);
    }

    #[test]
    fn test_domain_is_inclusive() {
        let temp = FuzzyVariable::new("Temperature", 0., 50.).unwrap();

        assert!(temp.contains(0.));
        assert!(temp.contains(50.));
        assert!(!temp.contains(-0.01));
        assert!(!temp.contains(50.01));
        assert!(!temp.contains(f64::NAN));
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut inputs = Variables::new(VariableKind::Input);

        let key = inputs.add(FuzzyVariable::new("Temperature", 0., 50.).unwrap()).unwrap();
        let err = inputs.add(FuzzyVariable::new("Temperature", -10., 10.).unwrap()).unwrap_err();

        assert_eq!(err.to_string(), "input variable 'Temperature' already exists");
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs.key("Temperature"), Some(key));
        assert_eq!(inputs.by_key(key).max(), 50.);
    }

    #[test]
    fn test_registry_add_set() {
        let mut outputs = Variables::new(VariableKind::Output);

        outputs.add(FuzzyVariable::new("FanSpeed", 0., 100.).unwrap()).unwrap();

        let high = outputs.add_set("FanSpeed", tri("High", 50., 100., 100.)).unwrap();

        assert_eq!(high.set, "High");
        assert_eq!(outputs.get("FanSpeed").unwrap().len(), 1);
        assert_eq!(
            outputs.add_set("Valve", tri("Open", 0., 1., 1.)),
            Err(ConfigError::UnknownVariable {
                kind: VariableKind::Output,
                name: "Valve".into(),
            })
        );
        assert!(outputs.add_set("FanSpeed", tri("High", 0., 1., 2.)).is_err());
        assert_eq!(outputs.get("FanSpeed").unwrap().len(), 1);
    }
}
