use std::collections::HashMap;

use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::error::{ConfigError, InferenceError, RuleError};
use crate::inputs::Inputs;
use crate::ops::DefuzzificationMethod;
use crate::outputs::Outputs;
use crate::rules::{CompiledRule, KeyedMemberships, Rule, Rules};
use crate::terms::FuzzySet;
use crate::variable::{FuzzyVariable, SetKey, SetRef, VariableKey, VariableKind, Variables};

/// A Mamdani inference system: input and output variables, the rules linking
/// them, and how outputs are defuzzificated.
///
/// Setup takes `&mut self`; [`infer`](Self::infer) only reads, so a fully
/// configured engine can be shared between threads.
#[derive(Clone, Debug)]
pub struct InferenceEngine {
    inputs: Variables,
    outputs: Variables,
    rules: Rules,
    config: EngineConfig,
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceEngine {
    pub fn new() -> Self {
        Self {
            inputs: Variables::new(VariableKind::Input),
            outputs: Variables::new(VariableKind::Output),
            rules: Rules::new(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self { config, ..Self::new() })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn resolution(&self) -> usize {
        self.config.resolution
    }

    pub fn set_resolution(&mut self, resolution: usize) -> Result<(), ConfigError> {
        if resolution == 0 {
            return Err(ConfigError::InvalidResolution(resolution));
        }

        debug!(resolution, "set defuzzification resolution");
        self.config.resolution = resolution;

        Ok(())
    }

    pub fn defuzzification(&self) -> DefuzzificationMethod {
        self.config.defuzzification
    }

    pub fn set_defuzzification(&mut self, method: DefuzzificationMethod) {
        debug!(%method, "set defuzzification method");
        self.config.defuzzification = method;
    }

    /// Like [`set_defuzzification`](Self::set_defuzzification), by method
    /// name: `centroid`, `mom`, `fom`, `lom` or `som`.
    pub fn set_defuzzification_method(&mut self, name: &str) -> Result<(), ConfigError> {
        self.set_defuzzification(name.parse()?);

        Ok(())
    }

    pub fn add_input_variable(&mut self, var: FuzzyVariable) -> Result<(), ConfigError> {
        debug!(name = var.name(), sets = var.len(), "adding input variable");
        self.inputs.add(var).map(drop)
    }

    pub fn add_output_variable(&mut self, var: FuzzyVariable) -> Result<(), ConfigError> {
        debug!(name = var.name(), sets = var.len(), "adding output variable");
        self.outputs.add(var).map(drop)
    }

    pub fn input_variable(&self, name: &str) -> Option<&FuzzyVariable> {
        self.inputs.get(name)
    }

    pub fn output_variable(&self, name: &str) -> Option<&FuzzyVariable> {
        self.outputs.get(name)
    }

    /// Adds a set to a registered input variable, making it available to
    /// rules added from now on. Registered variables are otherwise read-only.
    pub fn add_input_set(&mut self, variable: &str, set: FuzzySet) -> Result<SetRef, ConfigError> {
        debug!(variable, set = set.name(), "adding input set");
        self.inputs.add_set(variable, set)
    }

    pub fn add_output_set(&mut self, variable: &str, set: FuzzySet) -> Result<SetRef, ConfigError> {
        debug!(variable, set = set.name(), "adding output set");
        self.outputs.add_set(variable, set)
    }

    pub fn input_variables(&self) -> impl Iterator<Item = &FuzzyVariable> {
        self.inputs.iter().map(|(_, var)| var)
    }

    pub fn output_variables(&self) -> impl Iterator<Item = &FuzzyVariable> {
        self.outputs.iter().map(|(_, var)| var)
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().map(|compiled| &compiled.rule)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// At least one input variable, output variable and rule.
    pub fn is_configured(&self) -> bool {
        !self.inputs.is_empty() && !self.outputs.is_empty() && !self.rules.is_empty()
    }

    /// Validates `rule` against the variables registered right now and adds
    /// it. A rejected rule leaves the engine unchanged.
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), RuleError> {
        let compiled = self.compile(rule)?;

        debug!(
            rule = self.rules.len(),
            output = %compiled.rule.output().variable,
            set = %compiled.rule.output().set,
            conditions = compiled.antecedents.len(),
            "registered rule"
        );
        self.rules.add(compiled);

        Ok(())
    }

    fn compile(&self, rule: Rule) -> Result<CompiledRule, RuleError> {
        if rule.conditions().is_empty() {
            return Err(RuleError::NoConditions);
        }

        let output = rule.output();
        let out_key = self
            .outputs
            .key(&output.variable)
            .ok_or_else(|| RuleError::UnknownOutputVariable(output.variable.clone()))?;
        let out_set = self
            .outputs
            .by_key(out_key)
            .set_key(&output.set)
            .ok_or_else(|| RuleError::UnknownOutputSet {
                variable: output.variable.clone(),
                set: output.set.clone(),
            })?;
        let antecedents = rule
            .conditions()
            .iter()
            .enumerate()
            .map(|(i, cond)| -> Result<_, RuleError> {
                let var_key = self
                    .inputs
                    .key(&cond.variable)
                    .ok_or_else(|| RuleError::UnknownInputVariable {
                        index: i + 1,
                        variable: cond.variable.clone(),
                    })?;
                let set_key = self
                    .inputs
                    .by_key(var_key)
                    .set_key(&cond.set)
                    .ok_or_else(|| RuleError::UnknownInputSet {
                        index: i + 1,
                        variable: cond.variable.clone(),
                        set: cond.set.clone(),
                    })?;

                Ok((var_key, set_key))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledRule {
            rule,
            antecedents,
            consequent: (out_key, out_set),
        })
    }

    /// Computes a crisp value for every output variable.
    ///
    /// Every input variable needs a value inside its domain; keys naming no
    /// input variable are ignored. Fails as a whole if any output variable
    /// ends up with nothing fired.
    pub fn infer(&self, inputs: &Inputs) -> Result<Outputs, InferenceError> {
        if self.inputs.is_empty() {
            return Err(InferenceError::NoInputVariables);
        }
        if self.outputs.is_empty() {
            return Err(InferenceError::NoOutputVariables);
        }
        if self.rules.is_empty() {
            return Err(InferenceError::NoRules);
        }

        let mut crisp = Vec::with_capacity(self.inputs.len());

        for (key, var) in self.inputs.iter() {
            let value = inputs
                .get(var.name())
                .ok_or_else(|| InferenceError::MissingInput(var.name().to_owned()))?;

            if !var.contains(value) {
                return Err(InferenceError::OutOfBounds {
                    variable: var.name().to_owned(),
                    value,
                    min: var.min(),
                    max: var.max(),
                });
            }

            crisp.push((key, var, value));
        }

        // Fuzzificate
        let memberships: KeyedMemberships = crisp
            .into_iter()
            .map(|(key, var, value)| (key, var.fuzzify_keyed(value)))
            .collect();

        // Fire rules, keeping the strongest rule per output set
        let mut aggregated: HashMap<VariableKey, HashMap<SetKey, f64>> = HashMap::with_capacity(self.outputs.len());

        for (i, compiled) in self.rules.iter().enumerate() {
            let strength = compiled.fire(&memberships)?;
            let (var_key, set_key) = compiled.consequent;

            trace!(rule = i, strength, "fired rule");
            aggregated
                .entry(var_key)
                .or_default()
                .entry(set_key)
                .and_modify(|current| *current = f64::max(*current, strength))
                .or_insert(strength);
        }

        // Defuzzificate
        let method = self.config.defuzzification;
        let mut results = HashMap::with_capacity(self.outputs.len());

        for (key, var) in self.outputs.iter() {
            let aggregation: Vec<_> = aggregated
                .get(&key)
                .into_iter()
                .flatten()
                .filter_map(|(&set_key, &strength)| Some((var.set_by_key(set_key)?, strength)))
                .collect();
            let crisp = method
                .call(var, &aggregation, self.config.resolution)
                .map_err(|source| InferenceError::Defuzzification {
                    variable: var.name().to_owned(),
                    source,
                })?;

            trace!(output = var.name(), value = crisp, %method, "defuzzificated");
            results.insert(var.name().to_owned(), crisp);
        }

        Ok(Outputs::new(results))
    }
}
