use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_RESOLUTION;
use crate::error::{ConfigError, DefuzzError, InvalidMembershipDegree};
use crate::linspace::Linspace;
use crate::terms::FuzzySet;
use crate::variable::FuzzyVariable;

/// Tolerance for treating two aggregated degrees as the same maximum.
pub const EPSILON: f64 = 1e-9;

/// Zadeh operators over membership degrees.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// Minimum
    And,
    /// Maximum
    Or,
    /// Complement of the first value
    Not,
}

impl Operator {
    /// Combines `values`. Empty input yields 0 for `And`/`Or` and 1 for `Not`.
    ///
    /// Values outside `[0, 1]` (NaN included) are clamped before combining and
    /// the first one is reported alongside the result.
    pub fn apply(self, values: &[f64]) -> OperatorOutput {
        let mut invalid = None;
        let mut clamp = |raw: f64| {
            if (0. ..=1.).contains(&raw) {
                return raw;
            }

            if invalid.is_none() {
                invalid = Some(InvalidMembershipDegree { value: raw });
            }

            if raw > 1. {
                1.
            } else {
                0.
            }
        };
        let value = match self {
            Self::And => values.iter().map(|&v| clamp(v)).reduce(f64::min).unwrap_or(0.),
            Self::Or => values.iter().map(|&v| clamp(v)).reduce(f64::max).unwrap_or(0.),
            Self::Not => values.first().map_or(1., |&v| 1. - clamp(v)),
        };

        OperatorOutput { value, invalid }
    }
}

/// Result of an [`Operator`]: always a usable degree, plus a diagnostic when
/// some input had to be clamped.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperatorOutput {
    value: f64,
    invalid: Option<InvalidMembershipDegree>,
}

impl OperatorOutput {
    /// The combined degree, clamped inputs included.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn invalid(&self) -> Option<InvalidMembershipDegree> {
        self.invalid
    }

    /// Treats the diagnostic as a failure.
    pub fn into_result(self) -> Result<f64, InvalidMembershipDegree> {
        match self.invalid {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }
}

/// How the conditions of a rule are combined.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    pub fn operator(self) -> Operator {
        match self {
            Self::And => Operator::And,
            Self::Or => Operator::Or,
        }
    }
}

/// Method for defuzzificating the aggregated output of a variable.
///
/// Every method samples the output domain at `resolution + 1` evenly spaced
/// points and takes, at each point, the largest `set(x) * strength` over the
/// aggregated sets.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefuzzificationMethod {
    /// Center of Gravity
    Centroid,
    /// Mean of the values for which the membership function is maximum
    #[default]
    Mom,
    /// First value for which the membership function is maximum
    Fom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationMethod {
    pub const ALL: [Self; 5] = [Self::Centroid, Self::Mom, Self::Fom, Self::Lom, Self::Som];

    pub fn name(self) -> &'static str {
        match self {
            Self::Centroid => "centroid",
            Self::Mom => "mom",
            Self::Fom => "fom",
            Self::Lom => "lom",
            Self::Som => "som",
        }
    }

    /// Defuzzificates `strengths` (set name to firing strength) over the
    /// domain of `variable`. Names of sets the variable doesn't have are
    /// ignored. A `resolution` of zero falls back to the default.
    pub fn defuzzify(
        self,
        variable: &FuzzyVariable,
        strengths: &HashMap<String, f64>,
        resolution: usize,
    ) -> Result<f64, DefuzzError> {
        if strengths.is_empty() {
            return Err(DefuzzError::NoRuleFired);
        }

        let resolution = if resolution == 0 { DEFAULT_RESOLUTION } else { resolution };
        let aggregation: Vec<_> = strengths
            .iter()
            .filter_map(|(name, strength)| variable.set(name).map(|set| (set, *strength)))
            .collect();

        self.call(variable, &aggregation, resolution)
    }

    pub(crate) fn call(
        self,
        variable: &FuzzyVariable,
        aggregation: &[(&FuzzySet, f64)],
        resolution: usize,
    ) -> Result<f64, DefuzzError> {
        if aggregation.is_empty() {
            return Err(DefuzzError::NoRuleFired);
        }

        let samples = sample(variable, aggregation, resolution);

        match self {
            Self::Centroid => {
                let (num, den) = samples.fold((0., 0.), |(num, den), (x, degree)| (num + x * degree, den + degree));

                if den == 0. {
                    Err(DefuzzError::NoRuleFired)
                } else {
                    Ok(num / den)
                }
            },
            Self::Mom => Peak::scan(samples).map(|peak| peak.sum / peak.count as f64),
            // The scan is ascending, so the first maximum is also the smallest
            Self::Fom | Self::Som => Peak::scan(samples).map(|peak| peak.first),
            Self::Lom => Peak::scan(samples).map(|peak| peak.last),
        }
    }
}

impl fmt::Display for DefuzzificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DefuzzificationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| ConfigError::UnknownDefuzzificationMethod(s.to_owned()))
    }
}

/// `(x, aggregated degree at x)` over the domain of `variable`.
fn sample<'a>(
    variable: &FuzzyVariable,
    aggregation: &'a [(&'a FuzzySet, f64)],
    resolution: usize,
) -> impl Iterator<Item = (f64, f64)> + 'a {
    Linspace::samples(variable.min(), variable.max(), resolution).map(move |x| {
        let degree = aggregation
            .iter()
            .map(|(set, strength)| set.evaluate(x) * strength)
            .fold(0., f64::max);

        (x, degree)
    })
}

/// The points sharing the running maximum of a scan.
struct Peak {
    height: f64,
    first: f64,
    last: f64,
    sum: f64,
    count: usize,
}

impl Peak {
    fn at(x: f64, height: f64) -> Self {
        Peak {
            height,
            first: x,
            last: x,
            sum: x,
            count: 1,
        }
    }

    /// Fails when nothing in the scan rose above zero.
    fn scan(samples: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, DefuzzError> {
        let mut samples = samples.into_iter();
        let (x, degree) = samples.next().ok_or(DefuzzError::NoRuleFired)?;
        let mut peak = Peak::at(x, degree);

        for (x, degree) in samples {
            if degree > peak.height {
                peak = Peak::at(x, degree);
            } else if (degree - peak.height).abs() < EPSILON {
                peak.last = x;
                peak.sum += x;
                peak.count += 1;
            }
        }

        if peak.height > 0. {
            Ok(peak)
        } else {
            Err(DefuzzError::NoRuleFired)
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::membership::MembershipFunction;

    fn fan_speed() -> FuzzyVariable {
        let mut fan = FuzzyVariable::new("FanSpeed", 0., 100.).unwrap();

        fan.add_set(FuzzySet::new("Low", MembershipFunction::triangular(0., 0., 50.).unwrap()).unwrap())
            .unwrap();
        fan.add_set(FuzzySet::new("High", MembershipFunction::triangular(50., 100., 100.).unwrap()).unwrap())
            .unwrap();
        fan.add_set(
            FuzzySet::new("Medium", MembershipFunction::trapezoidal(20., 40., 60., 80.).unwrap()).unwrap(),
        )
        .unwrap();
        fan.add_set(FuzzySet::new("Mid", MembershipFunction::triangular(20., 50., 80.).unwrap()).unwrap())
            .unwrap();
        fan
    }

    fn strengths(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(name, s)| (name.to_string(), *s)).collect()
    }

    #[test]
    fn test_operators() {
        assert_eq!(Operator::And.apply(&[0.8, 0.6]).value(), 0.6);
        assert_eq!(Operator::Or.apply(&[0.8, 0.6]).value(), 0.8);
        assert_eq!(Operator::And.apply(&[0.2, 0.9, 0.4]).into_result(), Ok(0.2));
        assert_eq!(Operator::Or.apply(&[0.2, 0.9, 0.4]).into_result(), Ok(0.9));
        assert_relative_eq!(Operator::Not.apply(&[0.3]).value(), 0.7);
        assert_eq!(Operator::Not.apply(&[1.]).value(), 0.);

        for i in 0..=10 {
            let v = i as f64 / 10.;
            assert_eq!(Operator::Not.apply(&[v]).into_result(), Ok(1. - v));
        }
    }

    #[test]
    fn test_operators_on_empty_input() {
        assert_eq!(Operator::And.apply(&[]).into_result(), Ok(0.));
        assert_eq!(Operator::Or.apply(&[]).into_result(), Ok(0.));
        assert_eq!(Operator::Not.apply(&[]).into_result(), Ok(1.));
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped_and_reported() {
        let out = Operator::And.apply(&[0.5, 1.4, -0.2]);

        assert_eq!(out.value(), 0.);
        assert_eq!(out.invalid(), Some(InvalidMembershipDegree { value: 1.4 }));
        assert_eq!(out.into_result().unwrap_err().to_string(), "membership degree 1.4000 is outside [0, 1]");

        let out = Operator::Or.apply(&[0.5, -0.2, 1.4]);

        assert_eq!(out.value(), 1.);
        assert_eq!(out.invalid(), Some(InvalidMembershipDegree { value: -0.2 }));

        let out = Operator::Not.apply(&[-0.5]);

        assert_eq!(out.value(), 1.);
        assert_eq!(out.invalid(), Some(InvalidMembershipDegree { value: -0.5 }));

        let out = Operator::And.apply(&[f64::NAN, 0.4]);

        assert_eq!(out.value(), 0.);
        assert!(out.invalid().unwrap().value.is_nan());
    }

    #[test]
    fn test_connective_operator() {
        assert_eq!(Connective::default(), Connective::And);
        assert_eq!(Connective::And.operator(), Operator::And);
        assert_eq!(Connective::Or.operator(), Operator::Or);
    }

    #[test]
    fn test_method_names() {
        for method in DefuzzificationMethod::ALL {
            assert_eq!(method.to_string().parse::<DefuzzificationMethod>(), Ok(method));
        }

        assert_eq!("centroid".parse::<DefuzzificationMethod>(), Ok(DefuzzificationMethod::Centroid));
        assert_eq!(
            "bisector".parse::<DefuzzificationMethod>(),
            Err(ConfigError::UnknownDefuzzificationMethod("bisector".into()))
        );
        assert_eq!(DefuzzificationMethod::default(), DefuzzificationMethod::Mom);
    }

    #[test]
    fn test_centroid() {
        let fan = fan_speed();
        let high = strengths(&[("Low", 0.), ("High", 1.)]);
        let cog = DefuzzificationMethod::Centroid.defuzzify(&fan, &high, 1000).unwrap();

        // Continuous centroid of the right-angled triangle is 250 / 3
        assert_abs_diff_eq!(cog, 250. / 3., epsilon = 0.1);

        let mid = strengths(&[("Mid", 0.7)]);
        let cog = DefuzzificationMethod::Centroid.defuzzify(&fan, &mid, 1000).unwrap();

        assert_abs_diff_eq!(cog, 50., epsilon = 1e-6);
    }

    #[test]
    fn test_centroid_converges_with_resolution() {
        let fan = fan_speed();
        let high = strengths(&[("High", 1.)]);
        let at = |resolution| DefuzzificationMethod::Centroid.defuzzify(&fan, &high, resolution).unwrap();
        let (r1, r2, r4) = (at(100), at(200), at(400));

        assert!((r4 - r2).abs() < (r2 - r1).abs());
    }

    #[test]
    fn test_maximum_methods_on_a_peak() {
        let fan = fan_speed();
        let mid = strengths(&[("Low", 0.), ("Mid", 1.)]);
        // High is 0 on its right foot, so its maximum is the last sample before it
        let high = strengths(&[("Low", 0.), ("High", 1.)]);

        for method in [
            DefuzzificationMethod::Mom,
            DefuzzificationMethod::Fom,
            DefuzzificationMethod::Lom,
            DefuzzificationMethod::Som,
        ] {
            assert_abs_diff_eq!(method.defuzzify(&fan, &mid, 1000).unwrap(), 50., epsilon = 1e-9);
            assert_abs_diff_eq!(method.defuzzify(&fan, &high, 1000).unwrap(), 99.9, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_maximum_within_tolerance() {
        let mut var = FuzzyVariable::new("Valve", 0., 100.).unwrap();

        var.add_set(FuzzySet::new("Left", MembershipFunction::triangular(20., 30., 40.).unwrap()).unwrap())
            .unwrap();
        var.add_set(FuzzySet::new("Right", MembershipFunction::triangular(60., 70., 80.).unwrap()).unwrap())
            .unwrap();

        // Peaks 1e-12 apart count as the same maximum
        let level = strengths(&[("Left", 0.8 + 1e-12), ("Right", 0.8)]);

        assert_abs_diff_eq!(DefuzzificationMethod::Mom.defuzzify(&var, &level, 1000).unwrap(), 50., epsilon = 1e-9);
        assert_abs_diff_eq!(DefuzzificationMethod::Fom.defuzzify(&var, &level, 1000).unwrap(), 30., epsilon = 1e-9);
        assert_abs_diff_eq!(DefuzzificationMethod::Lom.defuzzify(&var, &level, 1000).unwrap(), 70., epsilon = 1e-9);

        // Beyond the tolerance only the higher peak counts
        let apart = strengths(&[("Left", 0.8 + 1e-6), ("Right", 0.8)]);

        assert_abs_diff_eq!(DefuzzificationMethod::Mom.defuzzify(&var, &apart, 1000).unwrap(), 30., epsilon = 1e-9);

        // A later sample strictly above the running maximum starts a new peak
        let rising = strengths(&[("Left", 0.8), ("Right", 0.8 + 1e-12)]);

        assert_abs_diff_eq!(DefuzzificationMethod::Mom.defuzzify(&var, &rising, 1000).unwrap(), 70., epsilon = 1e-9);
        assert_abs_diff_eq!(DefuzzificationMethod::Fom.defuzzify(&var, &rising, 1000).unwrap(), 70., epsilon = 1e-9);
    }

    #[test]
    fn test_maximum_methods_on_a_plateau() {
        let fan = fan_speed();
        let medium = strengths(&[("Medium", 0.6)]);

        for resolution in [1000, 2000] {
            let mom = DefuzzificationMethod::Mom.defuzzify(&fan, &medium, resolution).unwrap();
            let fom = DefuzzificationMethod::Fom.defuzzify(&fan, &medium, resolution).unwrap();
            let som = DefuzzificationMethod::Som.defuzzify(&fan, &medium, resolution).unwrap();
            let lom = DefuzzificationMethod::Lom.defuzzify(&fan, &medium, resolution).unwrap();

            assert_abs_diff_eq!(mom, 50., epsilon = 1e-9);
            assert_abs_diff_eq!(fom, 40., epsilon = 1e-9);
            assert_abs_diff_eq!(lom, 60., epsilon = 1e-9);
            assert_eq!(som, fom);
        }
    }

    #[test]
    fn test_strongest_set_wins() {
        let fan = fan_speed();
        let both = strengths(&[("Low", 0.9), ("High", 0.4)]);

        // Low is 0 on its left foot
        assert_abs_diff_eq!(
            DefuzzificationMethod::Fom.defuzzify(&fan, &both, 1000).unwrap(),
            0.1,
            epsilon = 1e-12
        );

        let cog = DefuzzificationMethod::Centroid.defuzzify(&fan, &both, 1000).unwrap();

        assert!(cog < 50.);
    }

    #[test]
    fn test_nothing_fired() {
        let fan = fan_speed();

        for method in DefuzzificationMethod::ALL {
            assert_eq!(
                method.defuzzify(&fan, &HashMap::new(), 1000),
                Err(DefuzzError::NoRuleFired)
            );
            assert_eq!(
                method.defuzzify(&fan, &strengths(&[("Low", 0.), ("High", 0.)]), 1000),
                Err(DefuzzError::NoRuleFired)
            );
            assert_eq!(
                method.defuzzify(&fan, &strengths(&[("Unknown", 1.)]), 1000),
                Err(DefuzzError::NoRuleFired)
            );
        }

        assert_eq!(
            DefuzzError::NoRuleFired.to_string(),
            "no rules fired: all membership degrees are zero"
        );
    }

    #[test]
    fn test_zero_resolution_uses_default() {
        let fan = fan_speed();
        let high = strengths(&[("High", 1.)]);

        assert_eq!(
            DefuzzificationMethod::Centroid.defuzzify(&fan, &high, 0),
            DefuzzificationMethod::Centroid.defuzzify(&fan, &high, DEFAULT_RESOLUTION)
        );
    }
}
