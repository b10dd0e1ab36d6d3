use std::{f64::consts, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{lexer::Op, parser::EvalError};

/// Unit in which the trigonometric functions read their argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    #[must_use]
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle.to_radians(),
            Self::Radians => angle,
        }
    }
}

/// The closed set of functions callable from an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sqrt,
    Fact,
    Sin,
    Cos,
    Tan,
    /// Base-10 logarithm
    Log,
    /// Natural logarithm
    Ln,
    Exp,
    Pow,
}

impl Function {
    pub const ALL: [Self; 9] = [
        Self::Sqrt,
        Self::Fact,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Log,
        Self::Ln,
        Self::Exp,
        Self::Pow,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Fact => "fact",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Log => "log",
            Self::Ln => "ln",
            Self::Exp => "exp",
            Self::Pow => "pow",
        }
    }

    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Pow => 2,
            _ => 1,
        }
    }

    /// Applies the function to already evaluated arguments.
    ///
    /// # Arguments
    /// * `args` - Argument values, in call order
    /// * `angle_unit` - How `sin`, `cos` and `tan` interpret their argument
    ///
    /// # Errors
    /// * `ArityMismatch` - `args` does not match [`Function::arity`]
    /// * `DomainError` - The argument lies outside the function's domain, or
    ///   the result is not a real number
    ///
    /// # Examples
    /// ```
    /// use scicalc::engine::{AngleUnit, Function};
    ///
    /// let value = Function::Pow.apply(&[2.0, 10.0], AngleUnit::Degrees).unwrap();
    /// assert_eq!(value, 1024.0);
    ///
    /// assert!(Function::Sqrt.apply(&[-1.0], AngleUnit::Degrees).is_err());
    /// ```
    pub fn apply(self, args: &[f64], angle_unit: AngleUnit) -> Result<f64, EvalError> {
        let value = match (self, args) {
            (Self::Sqrt, &[x]) => {
                if x < 0.0 {
                    return Err(domain_error(format!("sqrt of negative number {x}")));
                }
                x.sqrt()
            }
            (Self::Fact, &[x]) => factorial(x)?,
            (Self::Sin, &[x]) => angle_unit.to_radians(x).sin(),
            (Self::Cos, &[x]) => angle_unit.to_radians(x).cos(),
            (Self::Tan, &[x]) => angle_unit.to_radians(x).tan(),
            (Self::Log, &[x]) => {
                if x <= 0.0 {
                    return Err(domain_error(format!("log of non-positive number {x}")));
                }
                x.log10()
            }
            (Self::Ln, &[x]) => {
                if x <= 0.0 {
                    return Err(domain_error(format!("ln of non-positive number {x}")));
                }
                x.ln()
            }
            (Self::Exp, &[x]) => x.exp(),
            (Self::Pow, &[base, exponent]) => base.powf(exponent),
            _ => return Err(EvalError::ArityMismatch(self.name().to_string())),
        };

        ensure_real(value, || {
            let args: Vec<String> = args.iter().map(ToString::to_string).collect();
            format!("{self}({}) is not a real number", args.join(", "))
        })
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = EvalError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|function| function.name() == name)
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))
    }
}

/// Applies a binary operator to two folded operands.
///
/// # Errors
/// * `DivisionByZero` - `op` is `/` and `rhs` is zero of either sign
/// * `DomainError` - The result is NaN (`inf - inf`, `(-8)^0.5`, ...)
pub fn apply_binary(op: Op, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    let value = match op {
        Op::Add => lhs + rhs,
        Op::Sub => lhs - rhs,
        Op::Mul => lhs * rhs,
        Op::Div => {
            if rhs == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            lhs / rhs
        }
        Op::Pow => lhs.powf(rhs),
    };

    ensure_real(value, || {
        format!("{lhs} {} {rhs} is not a real number", op.symbol())
    })
}

/// Factorial of a non-negative integral double.
///
/// The argument may carry floating-point noise up to `f64::EPSILON` relative
/// to its magnitude; it is rounded before the product is taken. The product
/// overflows to infinity past `170!`, which is returned as is.
///
/// # Errors
/// Returns `DomainError` for negative, non-integral or non-finite arguments.
///
/// # Examples
/// ```
/// use scicalc::engine::factorial;
///
/// assert_eq!(factorial(5.0).unwrap(), 120.0);
/// assert!(factorial(2.5).is_err());
/// assert!(factorial(-1.0).is_err());
/// ```
pub fn factorial(x: f64) -> Result<f64, EvalError> {
    const LARGEST_FINITE: f64 = 170.0;

    if !x.is_finite() {
        return Err(domain_error(format!("factorial of non-integer {x}")));
    }
    if x < 0.0 {
        return Err(domain_error(format!("factorial of negative number {x}")));
    }
    let n = x.round();
    if (x - n).abs() > f64::EPSILON * x.abs().max(1.0) {
        return Err(domain_error(format!("factorial of non-integer {x}")));
    }
    if n > LARGEST_FINITE {
        return Ok(f64::INFINITY);
    }

    let mut result = 1.0;
    let mut i = 2.0;
    while i <= n {
        result *= i;
        i += 1.0;
    }
    Ok(result)
}

/// Looks up a named constant.
#[must_use]
pub fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(consts::PI),
        "e" => Some(consts::E),
        _ => None,
    }
}

fn domain_error(detail: String) -> EvalError {
    EvalError::DomainError(detail)
}

fn ensure_real(value: f64, detail: impl FnOnce() -> String) -> Result<f64, EvalError> {
    if value.is_nan() {
        Err(domain_error(detail()))
    } else {
        Ok(value)
    }
}
