use serde::{Deserialize, Serialize};

/// Piecewise-linear membership function.
///
/// Breakpoints must be non-decreasing. The high side of a trapezoid may be
/// open (`f64::INFINITY`), in which case membership never falls again.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Triangle {
        a: f64,
        b: f64,
        c: f64,
    },
    Trapezoid {
        a: f64,
        b: f64,
        #[serde(with = "open_bound")]
        c: f64,
        #[serde(with = "open_bound")]
        d: f64,
    },
}

impl Shape {
    pub fn triangle(a: f64, b: f64, c: f64) -> Shape {
        Shape::Triangle { a, b, c }
    }

    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> Shape {
        Shape::Trapezoid { a, b, c, d }
    }

    /// Trapezoid rising on `[a, b]` and staying at 1 from there on.
    pub fn open_right(a: f64, b: f64) -> Shape {
        Shape::Trapezoid {
            a,
            b,
            c: f64::INFINITY,
            d: f64::INFINITY,
        }
    }

    pub fn breakpoints(&self) -> Vec<f64> {
        match *self {
            Shape::Triangle { a, b, c } => vec![a, b, c],
            Shape::Trapezoid { a, b, c, d } => vec![a, b, c, d],
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let points = self.breakpoints();
        if points.iter().any(|x| x.is_nan()) {
            anyhow::bail!("Breakpoints {:?} contain NaN", points);
        }
        if !points[0].is_finite() || !points[1].is_finite() {
            anyhow::bail!("Breakpoints {:?} have an open lower side", points);
        }
        // Only a trapezoid's upper side may be open.
        if matches!(self, Shape::Triangle { .. }) && !points[2].is_finite() {
            anyhow::bail!("Triangle {:?} has an open upper side", points);
        }
        if points.windows(2).any(|w| w[0] > w[1]) {
            anyhow::bail!("Breakpoints {:?} are not monotonic", points);
        }
        Ok(())
    }

    /// Degree of membership of `x`, always in `[0, 1]`.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Shape::Triangle { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    rising(a, b, x)
                } else {
                    falling(b, c, x)
                }
            }
            Shape::Trapezoid { a, b, c, d } => {
                if x < a {
                    0.0
                } else if x < b {
                    rising(a, b, x)
                } else if x <= c {
                    1.0
                } else if d.is_infinite() {
                    1.0
                } else if x < d {
                    falling(c, d, x)
                } else {
                    0.0
                }
            }
        }
    }

    /// Center of the region where membership is 1, clamped to `[lo, hi]`.
    pub fn peak(&self, lo: f64, hi: f64) -> f64 {
        let (start, end) = match *self {
            Shape::Triangle { b, .. } => (b, b),
            Shape::Trapezoid { b, c, .. } => (b, c),
        };
        let (start, end) = (start.clamp(lo, hi), end.clamp(lo, hi));
        0.5 * (start + end)
    }
}

fn rising(a: f64, b: f64, x: f64) -> f64 {
    if b <= a {
        return 1.0;
    }
    ((x - a) / (b - a)).clamp(0.0, 1.0)
}

fn falling(c: f64, d: f64, x: f64) -> f64 {
    if d <= c {
        return if x <= c { 1.0 } else { 0.0 };
    }
    ((d - x) / (d - c)).clamp(0.0, 1.0)
}

/// JSON has no infinity, so an open bound is written as `null`.
mod open_bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
