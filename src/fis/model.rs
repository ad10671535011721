use serde::{Deserialize, Serialize};

/// Contents of a `.fis` file, before any validation against the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FisModel {
    pub system: SystemSection,
    pub inputs: Vec<VariableSection>,
    pub outputs: Vec<VariableSection>,
    pub rules: Vec<RuleSpec>,
}

/// The `[System]` section. Only `kind` and `defuzz_method` affect conversion.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSection {
    pub name: String,
    /// `mamdani` or `sugeno`
    pub kind: String,
    pub version: String,
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub num_rules: usize,
    pub and_method: String,
    pub or_method: String,
    pub imp_method: String,
    pub agg_method: String,
    pub defuzz_method: String,
}

/// An `[Input#]` or `[Output#]` section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableSection {
    pub name: String,
    pub range: [f64; 2],
    pub num_mfs: usize,
    pub mfs: Vec<MembershipSpec>,
}

/// `MFn='Name':'type',[params]`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MembershipSpec {
    pub name: String,
    pub kind: String,
    pub params: Vec<f64>,
}

/// A rule in the compact numeric form `a1 a2, c1 (weight) : connection`.
///
/// Membership function indices are 1-based per variable. An antecedent of 0
/// means "don't care" and a negative one negates the condition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub antecedents: Vec<i64>,
    pub consequents: Vec<i64>,
    pub weight: f64,
    /// 1 for AND, 2 for OR
    pub connection: u8,
}

impl Default for RuleSpec {
    fn default() -> Self {
        RuleSpec {
            antecedents: Vec::new(),
            consequents: Vec::new(),
            weight: 1.,
            connection: 1,
        }
    }
}
