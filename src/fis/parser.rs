use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::model::{FisModel, MembershipSpec, RuleSpec, SystemSection, VariableSection};
use super::FisError;

/// What was wrong with a single line of a `.fis` file.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected key=value")]
    MissingEquals,
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("invalid integer: {0}")]
    InvalidInteger(String),
    #[error("invalid range format: {0}")]
    InvalidRange(String),
    #[error("invalid MF format, missing params: {0}")]
    MissingParams(String),
    #[error("invalid MF format: {0}")]
    InvalidMembership(String),
    #[error("invalid rule format")]
    InvalidRule,
    #[error("invalid connection {0}: must be 1 (AND) or 2 (OR)")]
    InvalidConnection(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Section {
    System,
    Input,
    Output,
    Rules,
    Other,
}

impl Section {
    fn from_header(header: &str) -> Self {
        match header {
            "System" => Section::System,
            "Rules" => Section::Rules,
            _ if header.starts_with("Input") => Section::Input,
            _ if header.starts_with("Output") => Section::Output,
            _ => Section::Other,
        }
    }
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<FisModel, FisError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    debug!(path = %path.display(), "read FIS file");
    parse_str(&content)
}

/// Parses `.fis` text. Blank lines and lines starting with `#` or `%` are
/// skipped, as are lines outside any known section.
pub fn parse_str(content: &str) -> Result<FisModel, FisError> {
    let mut model = FisModel::default();
    let mut section = Section::Other;
    let mut variable: Option<VariableSection> = None;

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            finish_variable(&mut model, section, variable.take());
            section = Section::from_header(header);

            if matches!(section, Section::Input | Section::Output) {
                variable = Some(VariableSection::default());
            }
            continue;
        }

        let parsed = match (section, variable.as_mut()) {
            (Section::System, _) => parse_system_line(&mut model.system, line),
            (Section::Input | Section::Output, Some(var)) => parse_variable_line(var, line),
            (Section::Rules, _) => parse_rule_line(line).map(|rule| model.rules.push(rule)),
            _ => Ok(()),
        };

        parsed.map_err(|source| FisError::Parse {
            line: i + 1,
            text: line.to_owned(),
            source,
        })?;
    }

    finish_variable(&mut model, section, variable);

    debug!(
        name = %model.system.name,
        inputs = model.inputs.len(),
        outputs = model.outputs.len(),
        rules = model.rules.len(),
        "parsed FIS model"
    );

    Ok(model)
}

fn finish_variable(model: &mut FisModel, section: Section, variable: Option<VariableSection>) {
    match (section, variable) {
        (Section::Input, Some(var)) => model.inputs.push(var),
        (Section::Output, Some(var)) => model.outputs.push(var),
        _ => {},
    }
}

fn parse_system_line(system: &mut SystemSection, line: &str) -> Result<(), ParseError> {
    let (key, value) = key_value(line)?;

    match key {
        "Name" => system.name = value.to_owned(),
        "Type" => system.kind = value.to_owned(),
        "Version" => system.version = value.to_owned(),
        "NumInputs" => system.num_inputs = integer(value)?,
        "NumOutputs" => system.num_outputs = integer(value)?,
        "NumRules" => system.num_rules = integer(value)?,
        "AndMethod" => system.and_method = value.to_owned(),
        "OrMethod" => system.or_method = value.to_owned(),
        "ImpMethod" => system.imp_method = value.to_owned(),
        "AggMethod" => system.agg_method = value.to_owned(),
        "DefuzzMethod" => system.defuzz_method = value.to_owned(),
        _ => {},
    }

    Ok(())
}

fn parse_variable_line(variable: &mut VariableSection, line: &str) -> Result<(), ParseError> {
    let (key, value) = key_value(line)?;

    match key {
        "Name" => variable.name = value.to_owned(),
        "Range" => match array(value).as_deref() {
            Ok(&[min, max]) => variable.range = [min, max],
            _ => return Err(ParseError::InvalidRange(value.to_owned())),
        },
        "NumMFs" => variable.num_mfs = integer(value)?,
        _ if key.starts_with("MF") => variable.mfs.push(parse_membership(value)?),
        _ => {},
    }

    Ok(())
}

/// `'Cold':'trimf',[0 10 20]`
fn parse_membership(value: &str) -> Result<MembershipSpec, ParseError> {
    let bracket = value
        .find('[')
        .ok_or_else(|| ParseError::MissingParams(value.to_owned()))?;
    let (head, params) = value.split_at(bracket);
    let (name, kind) = head
        .split_once(':')
        .filter(|(_, kind)| !kind.contains(':'))
        .ok_or_else(|| ParseError::InvalidMembership(value.to_owned()))?;

    Ok(MembershipSpec {
        name: unquote(name).to_owned(),
        kind: kind.trim().trim_matches(|c| c == ',' || c == '\'' || c == '"').to_owned(),
        params: array(params)?,
    })
}

/// `1 2 0, 3 (1.0) : 1`
fn parse_rule_line(line: &str) -> Result<RuleSpec, ParseError> {
    let (antecedents, rest) = line.split_once(',').ok_or(ParseError::InvalidRule)?;
    let mut rule = RuleSpec {
        antecedents: indices(antecedents)?,
        ..RuleSpec::default()
    };
    let mut rest = rest.trim().to_owned();

    if let (Some(open), Some(close)) = (rest.find('('), rest.find(')')) {
        if close > open {
            rule.weight = number(&rest[open + 1..close])?;
            rest = format!("{}{}", &rest[..open], &rest[close + 1..]);
        }
    }

    let consequents = match rest.split_once(':') {
        Some((consequents, connection)) => {
            rule.connection = match connection.trim() {
                "1" => 1,
                "2" => 2,
                other => return Err(ParseError::InvalidConnection(other.to_owned())),
            };
            consequents
        },
        None => rest.as_str(),
    };

    rule.consequents = indices(consequents)?;

    Ok(rule)
}

/// `Key=Value` or `Key='Value'`
fn key_value(line: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = line.split_once('=').ok_or(ParseError::MissingEquals)?;

    Ok((key.trim(), unquote(value)))
}

fn unquote(s: &str) -> &str {
    s.trim().trim_matches(|c| c == '\'' || c == '"')
}

/// `[a b c]` or `[a, b, c]`
fn array(s: &str) -> Result<Vec<f64>, ParseError> {
    s.trim()
        .trim_matches(|c| c == '[' || c == ']')
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(number)
        .collect()
}

fn indices(s: &str) -> Result<Vec<i64>, ParseError> {
    s.split_whitespace()
        .map(|part| part.parse().map_err(|_| ParseError::InvalidInteger(part.to_owned())))
        .collect()
}

fn number(s: &str) -> Result<f64, ParseError> {
    let s = s.trim();

    s.parse().map_err(|_| ParseError::InvalidNumber(s.to_owned()))
}

fn integer(s: &str) -> Result<usize, ParseError> {
    s.trim().parse().map_err(|_| ParseError::InvalidInteger(s.to_owned()))
}
