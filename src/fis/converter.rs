use tracing::debug;

use super::model::{FisModel, MembershipSpec, RuleSpec, VariableSection};
use super::{FisError, RuleSpecError, ShapeError};
use crate::error::ConfigError;
use crate::inference::InferenceEngine;
use crate::membership::MembershipFunction;
use crate::ops::{Connective, DefuzzificationMethod};
use crate::rules::{Rule, RuleCondition};
use crate::terms::FuzzySet;
use crate::variable::{FuzzyVariable, VariableKind};

/// Builds an engine from a parsed model. Variables and rules are added in
/// file order; numbers in errors are 1-based, as in the file.
pub fn convert(model: &FisModel) -> Result<InferenceEngine, FisError> {
    let kind = model.system.kind.as_str();

    if !kind.is_empty() && kind != "mamdani" {
        return Err(FisError::UnsupportedSystem(kind.to_owned()));
    }

    debug!(name = %model.system.name, "converting FIS model");

    let mut engine = InferenceEngine::new();

    engine.set_defuzzification(defuzzification(&model.system.defuzz_method));

    for (i, spec) in model.inputs.iter().enumerate() {
        let var = variable(spec, VariableKind::Input, i + 1)?;

        engine
            .add_input_variable(var)
            .map_err(|source| variable_error(spec, VariableKind::Input, i + 1, source))?;
    }

    for (i, spec) in model.outputs.iter().enumerate() {
        let var = variable(spec, VariableKind::Output, i + 1)?;

        engine
            .add_output_variable(var)
            .map_err(|source| variable_error(spec, VariableKind::Output, i + 1, source))?;
    }

    for (i, spec) in model.rules.iter().enumerate() {
        rule(spec, model)
            .and_then(|rule| Ok(engine.add_rule(rule)?))
            .map_err(|source| FisError::Rule { index: i + 1, source })?;
    }

    Ok(engine)
}

/// `bisector` has no counterpart and is approximated by the centroid. Unknown
/// names fall back to the default method.
fn defuzzification(name: &str) -> DefuzzificationMethod {
    match name {
        "centroid" | "bisector" => DefuzzificationMethod::Centroid,
        "som" => DefuzzificationMethod::Som,
        "lom" => DefuzzificationMethod::Lom,
        _ => DefuzzificationMethod::Mom,
    }
}

fn variable_error(spec: &VariableSection, kind: VariableKind, index: usize, source: ConfigError) -> FisError {
    FisError::Variable {
        kind,
        index,
        name: spec.name.clone(),
        source,
    }
}

fn variable(spec: &VariableSection, kind: VariableKind, index: usize) -> Result<FuzzyVariable, FisError> {
    let [min, max] = spec.range;
    let mut var = FuzzyVariable::new(spec.name.as_str(), min, max)
        .map_err(|source| variable_error(spec, kind, index, source))?;

    for (i, mf) in spec.mfs.iter().enumerate() {
        shape(mf)
            .and_then(|function| Ok(FuzzySet::new(mf.name.as_str(), function)?))
            .and_then(|set| Ok(var.add_set(set)?))
            .map_err(|source| FisError::MembershipFunction {
                variable: spec.name.clone(),
                index: i + 1,
                name: mf.name.clone(),
                source,
            })?;
    }

    Ok(var)
}

fn shape(spec: &MembershipSpec) -> Result<MembershipFunction, ShapeError> {
    let expect = |kind, expected| {
        if spec.params.len() == expected {
            Ok(())
        } else {
            Err(ShapeError::ParamCount {
                kind,
                expected,
                got: spec.params.len(),
            })
        }
    };
    let p = &spec.params;

    match spec.kind.as_str() {
        "trimf" => {
            expect("trimf", 3)?;
            Ok(MembershipFunction::triangular(p[0], p[1], p[2])?)
        },
        "trapmf" => {
            expect("trapmf", 4)?;
            Ok(MembershipFunction::trapezoidal(p[0], p[1], p[2], p[3])?)
        },
        // [sigma center]
        "gaussmf" => {
            expect("gaussmf", 2)?;
            Ok(MembershipFunction::gaussian(p[1], p[0])?)
        },
        other => Err(ShapeError::Unsupported(other.to_owned())),
    }
}

fn rule(spec: &RuleSpec, model: &FisModel) -> Result<Rule, RuleSpecError> {
    let (var_index, set_index) = spec
        .consequents
        .iter()
        .enumerate()
        .find(|&(_, &index)| index != 0)
        .map(|(i, &index)| (i, index))
        .ok_or(RuleSpecError::NoConsequent)?;

    if set_index < 0 {
        return Err(ConfigError::NegatedConsequent.into());
    }

    let output = model
        .outputs
        .get(var_index)
        .and_then(|var| Some((var, set_name(var, set_index.unsigned_abs())?)))
        .ok_or(RuleSpecError::OutputIndex {
            variable: var_index + 1,
            set: set_index,
        })?;
    let connective = if spec.connection == 2 { Connective::Or } else { Connective::And };
    let mut rule = Rule::new(RuleCondition::new(output.0.name.as_str(), output.1), connective)?;

    for (i, &index) in spec.antecedents.iter().enumerate() {
        if index == 0 {
            continue;
        }

        let input = model.inputs.get(i).ok_or(RuleSpecError::AntecedentIndex {
            position: i + 1,
            inputs: model.inputs.len(),
        })?;
        let set = set_name(input, index.unsigned_abs()).ok_or_else(|| RuleSpecError::SetIndex {
            index: index.saturating_abs(),
            variable: input.name.clone(),
        })?;
        let condition = if index < 0 {
            RuleCondition::not(input.name.as_str(), set)
        } else {
            RuleCondition::new(input.name.as_str(), set)
        };

        rule.add_condition(condition)?;
    }

    rule.set_weight(spec.weight)?;

    Ok(rule)
}

/// Name of the 1-based `index`th membership function of `var`.
fn set_name(var: &VariableSection, index: u64) -> Option<&str> {
    let i = usize::try_from(index).ok()?.checked_sub(1)?;

    var.mfs.get(i).map(|mf| mf.name.as_str())
}
