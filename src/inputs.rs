use std::collections::HashMap;

/// Crisp input values by variable name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs(pub(crate) HashMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn add(&mut self, variable: impl Into<String>, value: f64) {
        self.0.insert(variable.into(), value);
    }

    pub fn with(mut self, variable: impl Into<String>, value: f64) -> Self {
        self.add(variable, value);
        self
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, f64>> for Inputs {
    fn from(values: HashMap<String, f64>) -> Self {
        Inputs(values)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Inputs {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Inputs(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for Inputs {
    fn from(values: [(K, f64); N]) -> Self {
        values.into_iter().collect()
    }
}

#[test]
fn test_inputs() {
    let inputs = Inputs::new().with("Temperature", 21.5).with("Humidity", 40.);

    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs.get("Temperature"), Some(21.5));
    assert_eq!(inputs.get("Pressure"), None);
    assert_eq!(inputs, Inputs::from([("Temperature", 21.5), ("Humidity", 40.)]));

    let mut inputs = inputs;

    inputs.add("Temperature", 30.);
    assert_eq!(inputs.get("Temperature"), Some(30.));
}
