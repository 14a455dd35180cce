//! Rule expressions
//!
//! A small expression tree over snapshot features. Catalog rules are built
//! from these so every rule can be serialized, inspected, and tested without
//! running a closure.

use feature_engine::{FeatureError, FeatureSnapshot};
use serde::{Deserialize, Serialize};

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl CmpOp {
    fn holds(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Eq => lhs == rhs,
        }
    }
}

/// Boolean condition on snapshot features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Compare {
        feature: String,
        op: CmpOp,
        value: f64,
    },
    OneOf {
        feature: String,
        values: Vec<f64>,
    },
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    pub fn compare(feature: &str, op: CmpOp, value: f64) -> Self {
        Condition::Compare {
            feature: feature.to_string(),
            op,
            value,
        }
    }

    pub fn lt(feature: &str, value: f64) -> Self {
        Self::compare(feature, CmpOp::Lt, value)
    }

    pub fn le(feature: &str, value: f64) -> Self {
        Self::compare(feature, CmpOp::Le, value)
    }

    pub fn gt(feature: &str, value: f64) -> Self {
        Self::compare(feature, CmpOp::Gt, value)
    }

    pub fn ge(feature: &str, value: f64) -> Self {
        Self::compare(feature, CmpOp::Ge, value)
    }

    pub fn equals(feature: &str, value: f64) -> Self {
        Self::compare(feature, CmpOp::Eq, value)
    }

    /// Inclusive range `min <= feature <= max`
    pub fn between(feature: &str, min: f64, max: f64) -> Self {
        Condition::All(vec![Self::ge(feature, min), Self::le(feature, max)])
    }

    pub fn one_of(feature: &str, values: &[f64]) -> Self {
        Condition::OneOf {
            feature: feature.to_string(),
            values: values.to_vec(),
        }
    }

    pub fn and(self, other: Condition) -> Self {
        Condition::All(vec![self, other])
    }

    pub fn eval(&self, snapshot: &FeatureSnapshot) -> Result<bool, FeatureError> {
        match self {
            Condition::Compare { feature, op, value } => {
                Ok(op.holds(snapshot.require(feature)?, *value))
            }
            Condition::OneOf { feature, values } => {
                let current = snapshot.require(feature)?;
                Ok(values.iter().any(|v| *v == current))
            }
            Condition::All(conditions) => {
                for condition in conditions {
                    if !condition.eval(snapshot)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Any(conditions) => {
                for condition in conditions {
                    if condition.eval(snapshot)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

/// Numeric expression over snapshot features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Const(f64),
    Feature(String),
    Add(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    /// First-match conditional
    Select {
        when: Condition,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Bounds applied to the inner value
    Clamp { expr: Box<Expr>, min: f64, max: f64 },
}

impl Expr {
    pub fn feature(name: &str) -> Self {
        Expr::Feature(name.to_string())
    }

    pub fn plus(self, amount: f64) -> Self {
        Expr::Add(Box::new(self), Box::new(Expr::Const(amount)))
    }

    pub fn times(self, factor: f64) -> Self {
        Expr::Mul(Box::new(self), Box::new(Expr::Const(factor)))
    }

    pub fn select(when: Condition, then: Expr, otherwise: Expr) -> Self {
        Expr::Select {
            when,
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn clamp(self, min: f64, max: f64) -> Self {
        Expr::Clamp {
            expr: Box::new(self),
            min,
            max,
        }
    }

    /// `self * factor` where `when` holds, otherwise `self`
    pub fn scaled_when(self, when: Condition, factor: f64) -> Self {
        self.scaled_by_each([(when, factor)])
    }

    /// Multiply by the factor of every condition that holds.
    ///
    /// Overlapping conditions compound: two matches at 0.3 and 0.4 give 0.12.
    pub fn scaled_by_each(self, factors: impl IntoIterator<Item = (Condition, f64)>) -> Self {
        factors.into_iter().fold(self, |acc, (when, factor)| {
            Expr::Mul(
                Box::new(acc),
                Box::new(Expr::select(when, Expr::Const(factor), Expr::Const(1.0))),
            )
        })
    }

    pub fn eval(&self, snapshot: &FeatureSnapshot) -> Result<f64, FeatureError> {
        match self {
            Expr::Const(value) => Ok(*value),
            Expr::Feature(name) => snapshot.require(name),
            Expr::Add(lhs, rhs) => Ok(lhs.eval(snapshot)? + rhs.eval(snapshot)?),
            Expr::Mul(lhs, rhs) => Ok(lhs.eval(snapshot)? * rhs.eval(snapshot)?),
            Expr::Select {
                when,
                then,
                otherwise,
            } => {
                if when.eval(snapshot)? {
                    then.eval(snapshot)
                } else {
                    otherwise.eval(snapshot)
                }
            }
            Expr::Clamp { expr, min, max } => Ok(expr.eval(snapshot)?.max(*min).min(*max)),
        }
    }
}
