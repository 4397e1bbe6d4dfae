//! Primal and dual feasibility of the inner flux balance problem
//!
//! For fixed selection binaries the inner problem is the LP
//!
//! ```text
//! minimize    sum_{j selectable} (y1_j + y2_j) v_j
//! subject to  S v = b                          (lambda, free)
//!             v_j = f_j        j fixed         (rho, free)
//!             v_j >= lb_j      j free          (mu >= 0)
//!             v_j <= ub_j      j free          (nu >= 0)
//! ```
//!
//! Its primal rows, the stationarity rows of its dual and the equality of both
//! objectives together characterize the optimal inner fluxes with linear rows only.
//! The bilinear products `y v` appear through the witness columns.
use crate::metabolic_model::network::NetworkPrimitives;
use crate::must_set::layout::{ColumnLayout, Slot};
use crate::must_set::partition::ReactionPartition;
use crate::optimize::constraint::RowSense;
use crate::optimize::problem::{MilpProblem, ProblemError};

/// Mass balance, fixed flux and flux bound rows
pub(crate) fn add_primal_feasibility(
    problem: &mut MilpProblem,
    network: &NetworkPrimitives,
    partition: &ReactionPartition,
    layout: &ColumnLayout,
    fixed: &[(usize, f64)],
) -> Result<(), ProblemError> {
    let rows = network.stoichiometry_rows();
    for (i, met) in network.metabolite_ids().iter().enumerate() {
        let row = rows.row(i);
        let terms = row
            .col_indices()
            .iter()
            .zip(row.values())
            .map(|(&j, &coef)| (layout.flux(j), coef))
            .collect::<Vec<_>>();
        problem.add_new_constraint(
            &format!("mass_balance[{}]", met),
            &terms,
            RowSense::Equal,
            network.balance_rhs()[i],
        )?;
    }
    for &(j, value) in fixed {
        problem.add_new_constraint(
            &format!("fixed_flux[{}]", network.reaction_id(j)),
            &[(layout.flux(j), 1.)],
            RowSense::Equal,
            value,
        )?;
    }
    for j in partition.free() {
        let id = network.reaction_id(j);
        problem.add_new_constraint(
            &format!("flux_lower[{}]", id),
            &[(layout.flux(j), 1.)],
            RowSense::GreaterOrEqual,
            network.lower_bounds()[j],
        )?;
        problem.add_new_constraint(
            &format!("flux_upper[{}]", id),
            &[(layout.flux(j), 1.)],
            RowSense::LessOrEqual,
            network.upper_bounds()[j],
        )?;
    }
    Ok(())
}

/// One stationarity row per reaction
///
/// `sum_i S_ij lambda_i + correction_j = 0`, where the correction is `rho_j` for a
/// fixed reaction, `mu_j - nu_j - y1_j - y2_j` for a selectable one and `mu_j - nu_j`
/// for any other free reaction.
pub(crate) fn add_dual_feasibility(
    problem: &mut MilpProblem,
    network: &NetworkPrimitives,
    layout: &ColumnLayout,
) -> Result<(), ProblemError> {
    let stoichiometry = network.stoichiometry();
    for j in 0..network.num_reactions() {
        let column = stoichiometry.col(j);
        let mut terms = column
            .row_indices()
            .iter()
            .zip(column.values())
            .map(|(&i, &coef)| (layout.metabolite_dual(i), coef))
            .collect::<Vec<_>>();
        if let Some(rho) = layout.fixed_dual(j) {
            terms.push((rho, 1.));
        }
        if let (Some(mu), Some(nu)) = (layout.lower_bound_dual(j), layout.upper_bound_dual(j)) {
            terms.push((mu, 1.));
            terms.push((nu, -1.));
        }
        if let Some(cols) = layout.slot(j) {
            for slot in Slot::BOTH {
                terms.push((cols.select(slot), -1.));
            }
        }
        problem.add_new_constraint(
            &format!("stationarity[{}]", network.reaction_id(j)),
            &terms,
            RowSense::Equal,
            0.,
        )?;
    }
    Ok(())
}

/// Equality of the inner primal objective and its dual objective
///
/// `sum (w1_j + w2_j) - b'lambda - f'rho - lb'mu + ub'nu = 0`
pub(crate) fn add_zero_duality_gap(
    problem: &mut MilpProblem,
    network: &NetworkPrimitives,
    partition: &ReactionPartition,
    layout: &ColumnLayout,
    fixed: &[(usize, f64)],
) -> Result<(), ProblemError> {
    let mut terms = Vec::new();
    for (_, cols) in layout.slots() {
        for slot in Slot::BOTH {
            terms.push((cols.witness(slot), 1.));
        }
    }
    for (i, &rhs) in network.balance_rhs().iter().enumerate() {
        if rhs != 0. {
            terms.push((layout.metabolite_dual(i), -rhs));
        }
    }
    for &(j, value) in fixed {
        if let (Some(rho), true) = (layout.fixed_dual(j), value != 0.) {
            terms.push((rho, -value));
        }
    }
    for j in partition.free() {
        let (lower, upper) = (network.lower_bounds()[j], network.upper_bounds()[j]);
        if let (Some(mu), true) = (layout.lower_bound_dual(j), lower != 0.) {
            terms.push((mu, -lower));
        }
        if let (Some(nu), true) = (layout.upper_bound_dual(j), upper != 0.) {
            terms.push((nu, upper));
        }
    }
    problem.add_new_constraint("zero_duality_gap", &terms, RowSense::Equal, 0.)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::must_set::test_utils::{
        network_of, toy_assignment, toy_network, toy_partition, Entry, TOY_FIXED,
    };

    fn inner_rows() -> (MilpProblem, ColumnLayout) {
        let network = toy_network();
        let partition = toy_partition();
        let mut problem = MilpProblem::new_maximization();
        let layout = ColumnLayout::allocate(&mut problem, &network, &partition, 2000.).unwrap();
        add_primal_feasibility(&mut problem, &network, &partition, &layout, &TOY_FIXED).unwrap();
        add_dual_feasibility(&mut problem, &network, &layout).unwrap();
        add_zero_duality_gap(&mut problem, &network, &partition, &layout, &TOY_FIXED).unwrap();
        (problem, layout)
    }

    #[test]
    fn row_counts() {
        let (problem, _) = inner_rows();
        // 2 mass balances, 1 fixed flux, 2 x 2 bounds, 3 stationarity rows, 1 gap
        assert_eq!(problem.num_constraints(), 2 + 1 + 4 + 3 + 1);
        let stationarity = problem.constraint_by_id("stationarity[R1]").unwrap();
        // lambda_a, lambda_b, mu, nu, y1, y2
        assert_eq!(stationarity.terms.len(), 6);
        let fixed = problem.constraint_by_id("stationarity[EX_a]").unwrap();
        assert_eq!(fixed.terms.len(), 2);
    }

    #[test]
    fn optimal_inner_point_satisfies_every_row() {
        let (problem, layout) = inner_rows();
        let values = toy_assignment(&problem, &layout);
        assert_eq!(
            problem.violated_constraints(&values, 1e-9).unwrap(),
            Vec::<&str>::new()
        );
        assert!(problem.is_feasible(&values, 1e-9).unwrap());
    }

    #[test]
    fn wrong_dual_breaks_the_gap() {
        let (problem, layout) = inner_rows();
        let mut values = toy_assignment(&problem, &layout);
        // Dual feasible, but not optimal
        values[layout.metabolite_dual(0)] -= 1.;
        values[layout.metabolite_dual(1)] -= 1.;
        values[layout.fixed_dual(0).unwrap()] -= 1.;
        values[layout.upper_bound_dual(2).unwrap()] = 1.;
        assert_eq!(
            problem.violated_constraints(&values, 1e-9).unwrap(),
            vec!["zero_duality_gap"]
        );
    }

    /// Producers `R1` in `[0, 10]` and `R2` in `[-3, 4]` of a, drain `R3` fixed at 10,
    /// isolated `R4` in `[1, 5]`; `R1` and `R4` selectable
    fn bounded_rows() -> (MilpProblem, ColumnLayout) {
        let reactions: [Entry; 4] = [
            ("R1", &[("a", 1.)], 0., 10.),
            ("R2", &[("a", 1.)], -3., 4.),
            ("R3", &[("a", -1.)], 0., 1000.),
            ("R4", &[], 1., 5.),
        ];
        let network = network_of(&reactions);
        let partition = ReactionPartition::from_indices(&[true, false, false, true], &[2], &[]);
        let fixed = [(2, 10.)];
        let mut problem = MilpProblem::new_maximization();
        let layout = ColumnLayout::allocate(&mut problem, &network, &partition, 2000.).unwrap();
        add_primal_feasibility(&mut problem, &network, &partition, &layout, &fixed).unwrap();
        add_dual_feasibility(&mut problem, &network, &layout).unwrap();
        add_zero_duality_gap(&mut problem, &network, &partition, &layout, &fixed).unwrap();
        (problem, layout)
    }

    #[test]
    fn bound_duals_close_the_gap() {
        let (problem, layout) = bounded_rows();
        let gap = problem.constraint_by_id("zero_duality_gap").unwrap();
        let coefficient = |column: usize| {
            gap.terms
                .iter()
                .find(|t| t.column == column)
                .map(|t| t.coefficient)
        };
        assert_eq!(coefficient(layout.lower_bound_dual(0).unwrap()), None);
        assert_eq!(coefficient(layout.upper_bound_dual(0).unwrap()), Some(10.));
        assert_eq!(coefficient(layout.lower_bound_dual(1).unwrap()), Some(3.));
        assert_eq!(coefficient(layout.upper_bound_dual(1).unwrap()), Some(4.));
        assert_eq!(coefficient(layout.lower_bound_dual(3).unwrap()), Some(-1.));
        assert_eq!(coefficient(layout.fixed_dual(2).unwrap()), Some(-10.));

        // R1 first and R4 second: minimizing v1 + v4 pushes R2 to its upper bound
        // and R4 to its lower bound, so v = (6, 4, 10, 1), lambda = 1, rho = 1,
        // nu_R2 = 1 and mu_R4 = 1.
        let r1 = *layout.slot(0).unwrap();
        let r4 = *layout.slot(3).unwrap();
        let mut values = vec![0.; problem.num_variables()];
        for (j, flux) in [6., 4., 10., 1.].into_iter().enumerate() {
            values[layout.flux(j)] = flux;
        }
        values[r1.select_first] = 1.;
        values[r1.witness_first] = 6.;
        values[r4.select_second] = 1.;
        values[r4.witness_second] = 1.;
        values[layout.metabolite_dual(0)] = 1.;
        values[layout.fixed_dual(2).unwrap()] = 1.;
        values[layout.upper_bound_dual(1).unwrap()] = 1.;
        values[layout.lower_bound_dual(3).unwrap()] = 1.;
        assert_eq!(
            problem.violated_constraints(&values, 1e-9).unwrap(),
            Vec::<&str>::new()
        );

        // A feasible but worse inner flux leaves a gap
        values[layout.flux(1)] = 3.;
        values[layout.flux(0)] = 7.;
        values[r1.witness_first] = 7.;
        assert_eq!(
            problem.violated_constraints(&values, 1e-9).unwrap(),
            vec!["zero_duality_gap"]
        );
    }
}
