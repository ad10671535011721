use crate::error::MembershipError;

/// Shape parameters of a membership function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Left foot, peak, right foot
    Triangular { a: f64, b: f64, c: f64 },
    /// Left foot, plateau start, plateau end, right foot
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    Gaussian { center: f64, width: f64 },
}

/// A validated membership function. Only the constructors can build one, so
/// every instance satisfies the ordering constraints of its shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MembershipFunction(Shape);

impl MembershipFunction {
    /// Requires `a <= b <= c`.
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self, MembershipError> {
        finite(&[a, b, c])?;
        if a > b || b > c {
            return Err(MembershipError::Triangular { a, b, c });
        }

        Ok(Self(Shape::Triangular { a, b, c }))
    }

    /// Requires `a <= b <= c <= d`.
    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self, MembershipError> {
        finite(&[a, b, c, d])?;
        if a > b || b > c || c > d {
            return Err(MembershipError::Trapezoidal { a, b, c, d });
        }

        Ok(Self(Shape::Trapezoidal { a, b, c, d }))
    }

    /// Requires `width > 0`.
    pub fn gaussian(center: f64, width: f64) -> Result<Self, MembershipError> {
        finite(&[center, width])?;
        if width <= 0. {
            return Err(MembershipError::GaussianWidth(width));
        }

        Ok(Self(Shape::Gaussian { center, width }))
    }

    pub fn shape(&self) -> Shape {
        self.0
    }

    /// Degree of membership of `x`, always in `[0, 1]`.
    ///
    /// Vertical edges never divide by zero. A collapsed shape is an impulse
    /// that is 1 at its single point and 0 elsewhere; otherwise the feet are
    /// 0 even where a peak or plateau sits on them, so a shoulder such as
    /// `triangular(0, 0, 20)` is 0 at 0.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self.0 {
            Shape::Triangular { a, b, c } => {
                if a == c {
                    return impulse(a, x);
                }
                if x <= a || x >= c {
                    0.
                } else if x == b {
                    1.
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            },
            Shape::Trapezoidal { a, b, c, d } => {
                if a == d {
                    return impulse(a, x);
                }
                if x <= a || x >= d {
                    0.
                } else if b <= x && x <= c {
                    1.
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            },
            Shape::Gaussian { center, width } => {
                let exponent = -((x - center) * (x - center)) / (2. * width * width);

                exponent.exp()
            },
        }
    }
}

fn impulse(at: f64, x: f64) -> f64 {
    if x == at {
        1.
    } else {
        0.
    }
}

fn finite(params: &[f64]) -> Result<(), MembershipError> {
    if params.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        Err(MembershipError::NonFinite)
    }
}
