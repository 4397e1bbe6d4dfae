//! Module providing representation of optimization problem variables (columns)
use std::fmt::{Display, Formatter};

/// A column of a [`MilpProblem`](crate::optimize::problem::MilpProblem)
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Used to identify the variable, unique within a problem
    pub id: String,
    /// Continuous or binary, see [`VariableType`]
    pub variable_type: VariableType,
    /// Lowest value the variable may take
    pub lower_bound: f64,
    /// Highest value the variable may take
    pub upper_bound: f64,
    /// Coefficient of the variable in the linear objective
    pub objective_coefficient: f64,
    /// Column position of the variable in the problem
    pub index: usize,
}

impl Variable {
    /// Whether `value` lies within the variable bounds (and is integral for binaries)
    pub fn admits(&self, value: f64, tolerance: f64) -> bool {
        if value < self.lower_bound - tolerance || value > self.upper_bound + tolerance {
            return false;
        }
        match self.variable_type {
            VariableType::Continuous => true,
            VariableType::Binary => (value - value.round()).abs() <= tolerance,
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.id, self.variable_type)
    }
}

/// Represents the type of variable in an optimization problem
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq)]
pub enum VariableType {
    /// Continuous variable
    Continuous,
    /// Binary Variable
    Binary,
}

impl Display for VariableType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableType::Continuous => write!(f, "CONTINUOUS"),
            VariableType::Binary => write!(f, "BINARY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_admits_only_integral_values() {
        let y = Variable {
            id: "y".to_string(),
            variable_type: VariableType::Binary,
            lower_bound: 0.,
            upper_bound: 1.,
            objective_coefficient: 0.,
            index: 0,
        };
        assert!(y.admits(0., 1e-9));
        assert!(y.admits(1. - 1e-12, 1e-9));
        assert!(!y.admits(0.5, 1e-9));
        assert!(!y.admits(2., 1e-9));
        assert_eq!(format!("{}", y), "y:BINARY");
    }
}
