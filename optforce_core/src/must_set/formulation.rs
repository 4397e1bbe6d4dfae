//! Single level MILP of the MustLL problem
use tracing::debug;

use crate::metabolic_model::network::NetworkPrimitives;
use crate::must_set::dual;
use crate::must_set::error::MustSetError;
use crate::must_set::inputs::{ExcludedReactions, FixedFluxes, FluxEnvelope};
use crate::must_set::layout::ColumnLayout;
use crate::must_set::linking;
use crate::must_set::options::MustLLOptions;
use crate::must_set::outer;
use crate::must_set::partition::ReactionPartition;
use crate::optimize::problem::MilpProblem;

/// The MustLL bilevel problem, collapsed into one MILP
///
/// Holds every block which does not depend on previously found pairs; each search
/// iteration clones it and appends the no-good cuts with
/// [`MustLLFormulation::problem_with_cuts`].
#[derive(Debug, Clone)]
pub struct MustLLFormulation<'a> {
    network: &'a NetworkPrimitives,
    partition: ReactionPartition,
    layout: ColumnLayout,
    base: MilpProblem,
}

impl<'a> MustLLFormulation<'a> {
    /// Validate the inputs and assemble the cut independent problem
    ///
    /// # Errors
    /// - The envelope does not match the network
    /// - A fixed or excluded id is not a reaction of the network
    /// - `options.big_m` is too small for the network bounds or fixed values
    pub fn new(
        network: &'a NetworkPrimitives,
        envelope: &FluxEnvelope,
        fixed: &FixedFluxes,
        excluded: &ExcludedReactions,
        options: &MustLLOptions,
    ) -> Result<Self, MustSetError> {
        envelope.validate(network, options.candidate_tolerance)?;
        let fixed_values = fixed.resolve(network)?;
        let excluded = excluded.resolve(network)?;
        network.validate_big_m(options.big_m, &fixed_values)?;

        let fixed_indices = fixed_values.iter().map(|(j, _)| *j).collect::<Vec<_>>();
        let partition = ReactionPartition::from_indices(
            &envelope.candidate_mask(options.candidate_tolerance),
            &fixed_indices,
            &excluded,
        );

        let mut base = MilpProblem::new_maximization();
        let layout = ColumnLayout::allocate(&mut base, network, &partition, options.big_m)?;
        dual::add_primal_feasibility(&mut base, network, &partition, &layout, &fixed_values)?;
        dual::add_dual_feasibility(&mut base, network, &layout)?;
        dual::add_zero_duality_gap(&mut base, network, &partition, &layout, &fixed_values)?;
        linking::add_big_m_links(&mut base, network, &layout, options.big_m)?;
        outer::add_selection_rows(&mut base, &layout)?;
        outer::add_objective(&mut base, &layout, envelope.min(), options.min_improvement)?;

        debug!(
            reactions = network.num_reactions(),
            fixed = partition.fixed().len(),
            excluded = partition.excluded().len(),
            selectable = partition.candidate_free().len(),
            columns = base.num_variables(),
            rows = base.num_constraints(),
            "Built MustLL formulation"
        );
        Ok(MustLLFormulation {
            network,
            partition,
            layout,
            base,
        })
    }

    /// A new problem: the base blocks plus cuts forbidding each of `pairs` in both orders
    pub fn problem_with_cuts(&self, pairs: &[(usize, usize)]) -> Result<MilpProblem, MustSetError> {
        let mut problem = self.base.clone();
        outer::add_no_good_cuts(&mut problem, self.network, &self.layout, pairs)?;
        Ok(problem)
    }

    /// The problem without any cut
    pub fn base_problem(&self) -> &MilpProblem {
        &self.base
    }

    pub fn network(&self) -> &NetworkPrimitives {
        self.network
    }

    pub fn partition(&self) -> &ReactionPartition {
        &self.partition
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::must_set::test_utils::{
        toy_assignment, toy_envelope, toy_fixed, toy_network, ToyOracle,
    };
    use crate::metabolic_model::network::NetworkError;
    use crate::must_set::error::InputError;
    use crate::must_set::options::MustLLOptionsBuilder;
    use crate::optimize::solvers::MilpSolver;
    use crate::optimize::OptimizationStatus;

    #[test]
    fn toy_optimum_satisfies_every_row() {
        let network = toy_network();
        let formulation = MustLLFormulation::new(
            &network,
            &toy_envelope(),
            &toy_fixed(),
            &ExcludedReactions::new(),
            &MustLLOptions::default(),
        )
        .unwrap();
        let problem = formulation.base_problem();
        let values = toy_assignment(problem, formulation.layout());
        assert_eq!(
            problem.violated_constraints(&values, 1e-9).unwrap(),
            Vec::<&str>::new()
        );
        assert!(problem.violated_variables(&values, 1e-9).unwrap().is_empty());
        assert!((problem.objective_value(&values).unwrap() - 10.).abs() < 1e-9);
    }

    #[test]
    fn cuts_make_the_toy_infeasible() {
        let network = toy_network();
        let formulation = MustLLFormulation::new(
            &network,
            &toy_envelope(),
            &toy_fixed(),
            &ExcludedReactions::new(),
            &MustLLOptions::default(),
        )
        .unwrap();
        let cut = formulation.problem_with_cuts(&[(1, 2)]).unwrap();
        assert_eq!(
            cut.num_constraints(),
            formulation.base_problem().num_constraints() + 2
        );
        let values = toy_assignment(&cut, formulation.layout());
        assert_eq!(
            cut.violated_constraints(&values, 1e-9).unwrap(),
            vec!["no_good[0][R1,R2]"]
        );

        let mut oracle = ToyOracle::default();
        assert_eq!(
            oracle.solve(&cut).unwrap().status,
            OptimizationStatus::Infeasible
        );
        // Base problem untouched by the clone
        assert_eq!(
            oracle.solve(formulation.base_problem()).unwrap().status,
            OptimizationStatus::Optimal
        );
    }

    #[test]
    fn input_errors_surface() {
        let network = toy_network();
        let options = MustLLOptions::default();
        let unknown = ExcludedReactions::from_ids(["PGI"]);
        assert!(matches!(
            MustLLFormulation::new(&network, &toy_envelope(), &toy_fixed(), &unknown, &options),
            Err(MustSetError::Input(InputError::UnknownReaction { .. }))
        ));

        let small_m = MustLLOptionsBuilder::default().big_m(100.).build().unwrap();
        assert!(matches!(
            MustLLFormulation::new(
                &network,
                &toy_envelope(),
                &toy_fixed(),
                &ExcludedReactions::new(),
                &small_m
            ),
            Err(MustSetError::Network(NetworkError::BigMTooSmall { .. }))
        ));

        let short = FluxEnvelope::new(vec![0.], vec![1.]);
        assert!(matches!(
            MustLLFormulation::new(
                &network,
                &short,
                &toy_fixed(),
                &ExcludedReactions::new(),
                &options
            ),
            Err(MustSetError::Input(InputError::EnvelopeLengthMismatch { .. }))
        ));
    }

    #[test]
    fn excluded_reaction_has_no_binaries() {
        let network = toy_network();
        let formulation = MustLLFormulation::new(
            &network,
            &toy_envelope(),
            &toy_fixed(),
            &ExcludedReactions::from_ids(["R2"]),
            &MustLLOptions::default(),
        )
        .unwrap();
        assert_eq!(formulation.partition().candidate_free(), &[1]);
        assert!(formulation.layout().slot(2).is_none());
        assert!(formulation
            .base_problem()
            .variable_by_id("y1[R2]")
            .is_none());
    }
}
