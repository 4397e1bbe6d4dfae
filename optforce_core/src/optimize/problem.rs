//! Provides struct representing a mixed integer linear optimization problem
use crate::optimize::constraint::{Constraint, RowSense};
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::variable::{Variable, VariableType};
use indexmap::IndexMap;
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use thiserror::Error;

/// A mixed integer linear optimization problem
///
/// Variables are columns and constraints are rows; both keep insertion order, and a
/// variable's column index is its insertion position. A problem only grows, so indices
/// handed out by [`MilpProblem::add_new_variable`] stay valid.
#[derive(Debug, Clone)]
pub struct MilpProblem {
    /// Direction of the optimization
    sense: ObjectiveSense,
    /// Variables of the optimization problem
    variables: IndexMap<String, Variable>,
    /// Constraints of the optimization problem
    constraints: IndexMap<String, Constraint>,
}

impl MilpProblem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self {
            sense: objective_sense,
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }
    // endregion Creation Functions

    /// Update the objective sense of the problem
    pub fn update_objective_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    // region Adding Variables
    /// Create a new variable and add it to the optimization problem
    ///
    /// Returns the column index of the new variable.
    pub fn add_new_variable(
        &mut self,
        id: &str,
        variable_type: VariableType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<usize, ProblemError> {
        if self.variables.contains_key(id) {
            return Err(ProblemError::VariableIdAlreadyExists(id.to_string()));
        }
        if lower_bound.is_nan() || upper_bound.is_nan() || lower_bound > upper_bound {
            return Err(ProblemError::InvalidVariableBounds(id.to_string()));
        }
        let index = self.variables.len();
        self.variables.insert(
            id.to_string(),
            Variable {
                id: id.to_string(),
                variable_type,
                lower_bound,
                upper_bound,
                objective_coefficient: 0f64,
                index,
            },
        );
        Ok(index)
    }

    /// Create a new binary variable (bounds `[0, 1]`) and add it to the problem
    pub fn add_new_binary_variable(&mut self, id: &str) -> Result<usize, ProblemError> {
        self.add_new_variable(id, VariableType::Binary, 0f64, 1f64)
    }
    // endregion Adding Variables

    /// Set the objective coefficient of the variable in `column`
    pub fn set_objective_coefficient(
        &mut self,
        column: usize,
        coefficient: f64,
    ) -> Result<(), ProblemError> {
        match self.variables.get_index_mut(column) {
            Some((_, var)) => {
                var.objective_coefficient = coefficient;
                Ok(())
            }
            None => Err(ProblemError::NonExistentVariable(column)),
        }
    }

    // region Adding Constraints
    /// Add a constraint to the problem, returning its row index
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<usize, ProblemError> {
        self.validate_constraint(&constraint)?;
        let index = self.constraints.len();
        self.constraints.insert(constraint.id.clone(), constraint);
        Ok(index)
    }

    /// Create a new constraint from (column, coefficient) terms and add it to the problem
    pub fn add_new_constraint(
        &mut self,
        id: &str,
        terms: &[(usize, f64)],
        sense: RowSense,
        rhs: f64,
    ) -> Result<usize, ProblemError> {
        self.add_constraint(Constraint::new(id, terms, sense, rhs))
    }
    // endregion Adding Constraints

    // region Validation Functions
    /// Check that a constraint to be added is valid to add to this Problem
    fn validate_constraint(&self, constraint: &Constraint) -> Result<(), ProblemError> {
        if self.constraints.contains_key(&constraint.id) {
            return Err(ProblemError::ConstraintAlreadyExists(constraint.id.clone()));
        }
        if !constraint.rhs.is_finite() {
            return Err(ProblemError::NonFiniteCoefficient(constraint.id.clone()));
        }
        let mut seen = vec![false; self.variables.len()];
        for term in &constraint.terms {
            if term.column >= self.variables.len() {
                return Err(ProblemError::NonExistentVariablesInConstraint(
                    constraint.id.clone(),
                ));
            }
            if seen[term.column] {
                return Err(ProblemError::DuplicateTermInConstraint(constraint.id.clone()));
            }
            seen[term.column] = true;
            if !term.coefficient.is_finite() {
                return Err(ProblemError::NonFiniteCoefficient(constraint.id.clone()));
            }
        }
        Ok(())
    }
    // endregion Validation Functions

    // region Problem Views
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Variables in column order
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// Constraints in row order
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.values()
    }

    /// Variable in `column`, if any
    pub fn variable(&self, column: usize) -> Option<&Variable> {
        self.variables.get_index(column).map(|(_, v)| v)
    }

    /// Variable with the given id, if any
    pub fn variable_by_id(&self, id: &str) -> Option<&Variable> {
        self.variables.get(id)
    }

    /// Constraint with the given id, if any
    pub fn constraint_by_id(&self, id: &str) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    /// Objective coefficients in column order
    pub fn objective_vector(&self) -> Vec<f64> {
        self.variables
            .values()
            .map(|v| v.objective_coefficient)
            .collect()
    }

    /// Right hand sides in row order
    pub fn rhs_vector(&self) -> Vec<f64> {
        self.constraints.values().map(|c| c.rhs).collect()
    }

    /// Row senses in row order
    pub fn row_senses(&self) -> Vec<RowSense> {
        self.constraints.values().map(|c| c.sense).collect()
    }

    pub fn has_binary_variables(&self) -> bool {
        self.variables
            .values()
            .any(|v| v.variable_type == VariableType::Binary)
    }

    /// Materialize the sparse constraint matrix (rows x columns)
    pub fn constraint_matrix(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.num_constraints(), self.num_variables());
        for (row, cons) in self.constraints.values().enumerate() {
            for term in &cons.terms {
                coo.push(row, term.column, term.coefficient);
            }
        }
        CsrMatrix::from(&coo)
    }
    // endregion Problem Views

    // region Evaluate Assignments
    /// Objective value of a full assignment of the columns
    pub fn objective_value(&self, values: &[f64]) -> Result<f64, ProblemError> {
        self.check_assignment_length(values)?;
        Ok(self
            .variables
            .values()
            .zip(values)
            .map(|(v, x)| v.objective_coefficient * x)
            .sum())
    }

    /// Ids of the constraints violated by `values`
    pub fn violated_constraints(
        &self,
        values: &[f64],
        tolerance: f64,
    ) -> Result<Vec<&str>, ProblemError> {
        self.check_assignment_length(values)?;
        Ok(self
            .constraints
            .values()
            .filter(|c| !c.is_satisfied(values, tolerance))
            .map(|c| c.id.as_str())
            .collect())
    }

    /// Ids of the variables whose value is outside their bounds, or not integral for binaries
    pub fn violated_variables(
        &self,
        values: &[f64],
        tolerance: f64,
    ) -> Result<Vec<&str>, ProblemError> {
        self.check_assignment_length(values)?;
        Ok(self
            .variables
            .values()
            .zip(values)
            .filter(|(v, x)| !v.admits(**x, tolerance))
            .map(|(v, _)| v.id.as_str())
            .collect())
    }

    /// Whether `values` satisfies every constraint and variable bound
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> Result<bool, ProblemError> {
        Ok(self.violated_constraints(values, tolerance)?.is_empty()
            && self.violated_variables(values, tolerance)?.is_empty())
    }

    fn check_assignment_length(&self, values: &[f64]) -> Result<(), ProblemError> {
        if values.len() != self.variables.len() {
            return Err(ProblemError::AssignmentLengthMismatch {
                expected: self.variables.len(),
                found: values.len(),
            });
        }
        Ok(())
    }
    // endregion Evaluate Assignments
}

/// Errors associated with the MilpProblem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add variable {0}, but a variable with that id already exists")]
    VariableIdAlreadyExists(String),
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to add variable {0} with lower_bound>upper_bound")]
    InvalidVariableBounds(String),
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add constraint {0}, but a constraint with that id already exists")]
    ConstraintAlreadyExists(String),
    /// Error when trying to add a constraint that contains variables not in the problem
    #[error("Tried to add constraint {0} with variables not in the problem")]
    NonExistentVariablesInConstraint(String),
    /// Error when a constraint lists the same variable twice
    #[error("Constraint {0} contains the same variable more than once")]
    DuplicateTermInConstraint(String),
    /// Error when a constraint has a NaN or infinite coefficient or right hand side
    #[error("Constraint {0} has a non-finite coefficient or right hand side")]
    NonFiniteCoefficient(String),
    /// Error when trying to update a variable that doesn't exist
    #[error("Tried to access variable in column {0}, which doesn't exist")]
    NonExistentVariable(usize),
    /// Error when an assignment doesn't have one value per variable
    #[error("Expected an assignment of {expected} values, found {found}")]
    AssignmentLengthMismatch { expected: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_problem() {
        let max_problem = MilpProblem::new_maximization();
        assert_eq!(max_problem.sense(), ObjectiveSense::Maximize);

        let mut min_problem = MilpProblem::new_minimization();
        assert_eq!(min_problem.sense(), ObjectiveSense::Minimize);
        min_problem.update_objective_sense(ObjectiveSense::Maximize);
        assert_eq!(min_problem.sense(), ObjectiveSense::Maximize);
    }

    #[test]
    fn add_variables() {
        let mut problem = MilpProblem::new_maximization();
        let x = problem
            .add_new_variable("x", VariableType::Continuous, 64., 100.)
            .unwrap();
        let y = problem.add_new_binary_variable("y").unwrap();
        assert_eq!(x, 0);
        assert_eq!(y, 1);
        let var = problem.variable_by_id("y").unwrap();
        assert_eq!(var.variable_type, VariableType::Binary);
        assert_eq!(var.index, 1);
        assert!((var.upper_bound - 1.).abs() < 1e-25);
        assert!(problem.has_binary_variables());

        problem.set_objective_coefficient(x, 2.).unwrap();
        assert_eq!(problem.objective_vector(), vec![2., 0.]);
        assert_eq!(
            problem.set_objective_coefficient(5, 1.),
            Err(ProblemError::NonExistentVariable(5))
        );
    }

    #[test]
    fn add_bad_variable() {
        let mut problem = MilpProblem::new_maximization();
        let res = problem.add_new_variable("x", VariableType::Continuous, 100., 64.);
        assert_eq!(res, Err(ProblemError::InvalidVariableBounds("x".to_string())));

        problem
            .add_new_variable("x", VariableType::Continuous, 0., 1.)
            .unwrap();
        let res = problem.add_new_variable("x", VariableType::Continuous, 0., 1.);
        assert_eq!(res, Err(ProblemError::VariableIdAlreadyExists("x".to_string())));
    }

    #[test]
    fn add_constraints() {
        let mut problem = MilpProblem::new_maximization();
        let x = problem
            .add_new_variable("x", VariableType::Continuous, 0., 10.)
            .unwrap();
        let y = problem
            .add_new_variable("y", VariableType::Continuous, 0., 10.)
            .unwrap();
        problem
            .add_new_constraint("c1", &[(x, 2.), (y, 3.)], RowSense::Equal, 12.)
            .unwrap();
        problem
            .add_new_constraint("c2", &[(x, 1.)], RowSense::LessOrEqual, 3.)
            .unwrap();
        assert_eq!(problem.num_constraints(), 2);
        assert_eq!(problem.rhs_vector(), vec![12., 3.]);
        assert_eq!(
            problem.row_senses(),
            vec![RowSense::Equal, RowSense::LessOrEqual]
        );

        let matrix = problem.constraint_matrix();
        assert_eq!(matrix.nrows(), 2);
        assert_eq!(matrix.ncols(), 2);
        assert_eq!(matrix.nnz(), 3);
        assert_eq!(matrix.row(0).values(), &[2., 3.]);
    }

    #[test]
    fn add_bad_constraints() {
        let mut problem = MilpProblem::new_maximization();
        let x = problem
            .add_new_variable("x", VariableType::Continuous, 0., 10.)
            .unwrap();
        assert_eq!(
            problem.add_new_constraint("c", &[(x, 1.), (4, 1.)], RowSense::Equal, 0.),
            Err(ProblemError::NonExistentVariablesInConstraint("c".to_string()))
        );
        assert_eq!(
            problem.add_new_constraint("c", &[(x, 1.), (x, 1.)], RowSense::Equal, 0.),
            Err(ProblemError::DuplicateTermInConstraint("c".to_string()))
        );
        assert_eq!(
            problem.add_new_constraint("c", &[(x, f64::NAN)], RowSense::Equal, 0.),
            Err(ProblemError::NonFiniteCoefficient("c".to_string()))
        );
        problem
            .add_new_constraint("c", &[(x, 1.)], RowSense::Equal, 0.)
            .unwrap();
        assert_eq!(
            problem.add_new_constraint("c", &[(x, 1.)], RowSense::Equal, 0.),
            Err(ProblemError::ConstraintAlreadyExists("c".to_string()))
        );
    }

    #[test]
    fn evaluate_assignment() {
        let mut problem = MilpProblem::new_maximization();
        let x = problem
            .add_new_variable("x", VariableType::Continuous, 0., 10.)
            .unwrap();
        let y = problem.add_new_binary_variable("y").unwrap();
        problem.set_objective_coefficient(x, 1.).unwrap();
        problem
            .add_new_constraint("link", &[(x, 1.), (y, -10.)], RowSense::LessOrEqual, 0.)
            .unwrap();

        assert!(problem.is_feasible(&[5., 1.], 1e-9).unwrap());
        assert!((problem.objective_value(&[5., 1.]).unwrap() - 5.).abs() < 1e-25);
        assert_eq!(
            problem.violated_constraints(&[5., 0.], 1e-9).unwrap(),
            vec!["link"]
        );
        assert_eq!(problem.violated_variables(&[0., 0.5], 1e-9).unwrap(), vec!["y"]);
        assert_eq!(
            problem.is_feasible(&[0.], 1e-9),
            Err(ProblemError::AssignmentLengthMismatch {
                expected: 2,
                found: 1
            })
        );
    }
}
