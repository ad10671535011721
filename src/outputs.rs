use std::collections::HashMap;

/// Crisp results of one inference, by output variable name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outputs(HashMap<String, f64>);

impl Outputs {
    pub(crate) fn new(values: HashMap<String, f64>) -> Self {
        Outputs(values)
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> HashMap<String, f64> {
        self.0
    }
}
