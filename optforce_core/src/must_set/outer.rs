//! Selection logic and objective of the outer problem, plus the no-good cuts
use crate::metabolic_model::network::NetworkPrimitives;
use crate::must_set::error::MustSetError;
use crate::must_set::layout::{ColumnLayout, Slot};
use crate::optimize::constraint::RowSense;
use crate::optimize::problem::{MilpProblem, ProblemError};

/// Exactly one selectable reaction per slot
///
/// Fixed and excluded reactions have no selection columns, so they can never be chosen.
pub(crate) fn add_selection_rows(
    problem: &mut MilpProblem,
    layout: &ColumnLayout,
) -> Result<(), ProblemError> {
    for slot in Slot::BOTH {
        let terms = layout
            .slots()
            .map(|(_, cols)| (cols.select(slot), 1.))
            .collect::<Vec<_>>();
        problem.add_new_constraint(
            &format!("select_one[{}]", slot.label()),
            &terms,
            RowSense::Equal,
            1.,
        )?;
    }
    Ok(())
}

/// Define the outer objective and ask for its maximization
///
/// `z = sum (w1_j + w2_j) - sum wild_type_min_j (y1_j + y2_j)` and `z >= min_improvement`.
pub(crate) fn add_objective(
    problem: &mut MilpProblem,
    layout: &ColumnLayout,
    wild_type_min: &[f64],
    min_improvement: f64,
) -> Result<(), ProblemError> {
    let z = layout.objective();
    let mut terms = vec![(z, 1.)];
    for (j, cols) in layout.slots() {
        for slot in Slot::BOTH {
            terms.push((cols.witness(slot), -1.));
        }
        if wild_type_min[j] != 0. {
            for slot in Slot::BOTH {
                terms.push((cols.select(slot), wild_type_min[j]));
            }
        }
    }
    problem.add_new_constraint("objective_definition", &terms, RowSense::Equal, 0.)?;
    problem.add_new_constraint(
        "improvement_floor",
        &[(z, 1.)],
        RowSense::GreaterOrEqual,
        min_improvement,
    )?;
    problem.set_objective_coefficient(z, 1.)
}

/// Forbid the given pairs in both slot orders
///
/// Pair `(a, b)` adds `y1_a + y2_b <= 1` and `y1_b + y2_a <= 1`. Row ids carry the
/// position of the pair so repeated pairs still get distinct rows.
pub(crate) fn add_no_good_cuts(
    problem: &mut MilpProblem,
    network: &NetworkPrimitives,
    layout: &ColumnLayout,
    pairs: &[(usize, usize)],
) -> Result<(), MustSetError> {
    for (n, &(a, b)) in pairs.iter().enumerate() {
        let (cols_a, cols_b) = match (layout.slot(a), layout.slot(b)) {
            (Some(cols_a), Some(cols_b)) if a != b => (cols_a, cols_b),
            _ => {
                return Err(MustSetError::UnselectablePair {
                    first: reaction_label(network, a),
                    second: reaction_label(network, b),
                })
            }
        };
        let (id_a, id_b) = (network.reaction_id(a), network.reaction_id(b));
        problem.add_new_constraint(
            &format!("no_good[{}][{},{}]", n, id_a, id_b),
            &[(cols_a.select_first, 1.), (cols_b.select_second, 1.)],
            RowSense::LessOrEqual,
            1.,
        )?;
        problem.add_new_constraint(
            &format!("no_good[{}][{},{}]", n, id_b, id_a),
            &[(cols_b.select_first, 1.), (cols_a.select_second, 1.)],
            RowSense::LessOrEqual,
            1.,
        )?;
    }
    Ok(())
}

fn reaction_label(network: &NetworkPrimitives, index: usize) -> String {
    network
        .reaction_ids()
        .get_index(index)
        .cloned()
        .unwrap_or_else(|| format!("#{}", index))
}
