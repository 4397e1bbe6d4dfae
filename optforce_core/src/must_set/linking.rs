//! Big-M rows tying each witness column to its reaction flux
use crate::metabolic_model::network::NetworkPrimitives;
use crate::must_set::layout::{ColumnLayout, Slot};
use crate::optimize::constraint::RowSense;
use crate::optimize::problem::{MilpProblem, ProblemError};

/// Link witnesses to fluxes and keep a reaction out of both slots at once
///
/// For every selectable reaction `j` and slot `s`:
///
/// ```text
/// w_s - v + M y_s <= M      w_s - v - M y_s >= -M
/// w_s     - M y_s <= 0      w_s     + M y_s >= 0
/// ```
///
/// so `w_s = v` when `y_s = 1` and `w_s = 0` otherwise, provided `|v| <= M`.
/// `y1 + y2 <= 1` forbids selecting the reaction in both slots.
pub(crate) fn add_big_m_links(
    problem: &mut MilpProblem,
    network: &NetworkPrimitives,
    layout: &ColumnLayout,
    big_m: f64,
) -> Result<(), ProblemError> {
    for (j, cols) in layout.slots() {
        let id = network.reaction_id(j);
        let v = layout.flux(j);
        for slot in Slot::BOTH {
            let (w, y, n) = (cols.witness(slot), cols.select(slot), slot.label());
            problem.add_new_constraint(
                &format!("link{}_track_upper[{}]", n, id),
                &[(w, 1.), (v, -1.), (y, big_m)],
                RowSense::LessOrEqual,
                big_m,
            )?;
            problem.add_new_constraint(
                &format!("link{}_track_lower[{}]", n, id),
                &[(w, 1.), (v, -1.), (y, -big_m)],
                RowSense::GreaterOrEqual,
                -big_m,
            )?;
            problem.add_new_constraint(
                &format!("link{}_off_upper[{}]", n, id),
                &[(w, 1.), (y, -big_m)],
                RowSense::LessOrEqual,
                0.,
            )?;
            problem.add_new_constraint(
                &format!("link{}_off_lower[{}]", n, id),
                &[(w, 1.), (y, big_m)],
                RowSense::GreaterOrEqual,
                0.,
            )?;
        }
        problem.add_new_constraint(
            &format!("single_slot[{}]", id),
            &[(cols.select_first, 1.), (cols.select_second, 1.)],
            RowSense::LessOrEqual,
            1.,
        )?;
    }
    Ok(())
}
