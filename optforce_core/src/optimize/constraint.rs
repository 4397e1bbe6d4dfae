//! Provides struct for representing a constraint (row) in an optimization problem
use std::fmt::{Display, Formatter};

/// Relation between the left hand side of a constraint and its right hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSense {
    /// `terms = rhs`
    Equal,
    /// `terms <= rhs`
    LessOrEqual,
    /// `terms >= rhs`
    GreaterOrEqual,
}

impl Display for RowSense {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RowSense::Equal => write!(f, "="),
            RowSense::LessOrEqual => write!(f, "<="),
            RowSense::GreaterOrEqual => write!(f, ">="),
        }
    }
}

/// Represents a linear constraint in an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Used to identify the constraint, unique within a problem
    pub id: String,
    /// Linear terms which are added together, see [`ConstraintTerm`] for more
    pub terms: Vec<ConstraintTerm>,
    /// How the terms relate to `rhs`
    pub sense: RowSense,
    /// The right hand side of the constraint
    pub rhs: f64,
}

impl Constraint {
    /// Create a new constraint
    ///
    /// # Parameters
    /// - `id`: Identifier of the constraint
    /// - `terms`: Slice of (column index, coefficient) pairs
    /// - `sense`: Relation of the terms to the right hand side
    /// - `rhs`: The right hand side
    ///
    /// # Examples
    /// ```rust
    /// use optforce_core::optimize::constraint::{Constraint, RowSense};
    /// // Represents 3*x0 + 2*x1 <= 6
    /// let cons = Constraint::new("c", &[(0, 3.0), (1, 2.0)], RowSense::LessOrEqual, 6.);
    /// assert!(cons.is_satisfied(&[1.0, 1.5], 1e-9));
    /// assert!(!cons.is_satisfied(&[2.0, 1.0], 1e-9));
    /// ```
    pub fn new(id: &str, terms: &[(usize, f64)], sense: RowSense, rhs: f64) -> Self {
        Constraint {
            id: id.to_string(),
            terms: terms
                .iter()
                .map(|&(column, coefficient)| ConstraintTerm {
                    column,
                    coefficient,
                })
                .collect(),
            sense,
            rhs,
        }
    }

    /// Value of the left hand side at `values`
    ///
    /// # Panics
    /// If a term refers to a column outside `values`
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|t| t.coefficient * values[t.column])
            .sum()
    }

    /// Whether `values` satisfies this constraint within `tolerance`
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.activity(values);
        match self.sense {
            RowSense::Equal => (lhs - self.rhs).abs() <= tolerance,
            RowSense::LessOrEqual => lhs <= self.rhs + tolerance,
            RowSense::GreaterOrEqual => lhs >= self.rhs - tolerance,
        }
    }

    /// Convert the terms into a String representation
    fn terms_to_string(&self) -> String {
        if self.terms.is_empty() {
            return "0".to_string();
        }
        self.terms
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} {} {}",
            self.id,
            self.terms_to_string(),
            self.sense,
            self.rhs
        )
    }
}

/// Represents a single term in a constraint, specifically
/// represents the multiplication of the variable in `column` by the `coefficient`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintTerm {
    /// Column index of the variable
    pub column: usize,
    /// The coefficient for the variable
    pub coefficient: f64,
}

impl Display for ConstraintTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*x{}", self.coefficient, self.column)
    }
}
