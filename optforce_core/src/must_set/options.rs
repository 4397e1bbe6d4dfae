//! Per run options of the MustLL search
use derive_builder::Builder;

use crate::configuration;

/// Options controlling a single MustLL search
///
/// Defaults are read from the global [`configuration`](crate::configuration) at build time.
///
/// # Examples
/// ```rust
/// use optforce_core::must_set::MustLLOptionsBuilder;
/// let options = MustLLOptionsBuilder::default()
///     .max_iterations(10)
///     .build()
///     .unwrap();
/// assert_eq!(options.max_iterations, Some(10));
/// assert!((options.big_m - 2000.).abs() < 1e-12);
/// ```
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct MustLLOptions {
    /// Constant of the indicator linking, at least twice every relevant flux magnitude
    #[builder(default = "configuration::current().big_m")]
    pub big_m: f64,
    /// Smallest objective value for a pair to count as an improvement
    #[builder(default = "configuration::current().min_improvement")]
    pub min_improvement: f64,
    /// Envelope values at or below this magnitude count as zero for the candidate mask
    #[builder(default = "configuration::current().tolerance")]
    pub candidate_tolerance: f64,
    /// A selection binary above this value is considered active
    #[builder(default = "0.5")]
    pub binary_threshold: f64,
    /// Tolerance used to audit solutions returned by the solver
    #[builder(default = "1e-6")]
    pub feasibility_tolerance: f64,
    /// Stop after this many accepted pairs, `None` runs until the solver reports infeasible
    #[builder(default, setter(strip_option))]
    pub max_iterations: Option<usize>,
}

impl MustLLOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(big_m) = self.big_m {
            if !big_m.is_finite() || big_m <= 0. {
                return Err(format!("big_m must be positive and finite, got {}", big_m));
            }
        }
        if let Some(min_improvement) = self.min_improvement {
            if !min_improvement.is_finite() {
                return Err(format!(
                    "min_improvement must be finite, got {}",
                    min_improvement
                ));
            }
        }
        if let Some(threshold) = self.binary_threshold {
            if !(threshold > 0. && threshold < 1.) {
                return Err(format!(
                    "binary_threshold must be strictly between 0 and 1, got {}",
                    threshold
                ));
            }
        }
        for (name, value) in [
            ("candidate_tolerance", self.candidate_tolerance),
            ("feasibility_tolerance", self.feasibility_tolerance),
        ] {
            if let Some(tol) = value {
                if !tol.is_finite() || tol < 0. {
                    return Err(format!("{} must be non-negative, got {}", name, tol));
                }
            }
        }
        Ok(())
    }
}

impl Default for MustLLOptions {
    fn default() -> Self {
        let config = configuration::current();
        MustLLOptions {
            big_m: config.big_m,
            min_improvement: config.min_improvement,
            candidate_tolerance: config.tolerance,
            binary_threshold: 0.5,
            feasibility_tolerance: 1e-6,
            max_iterations: None,
        }
    }
}
