//! Global defaults shared by model construction and the Must set search
use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

/// Process wide default values
///
/// Reactions built without explicit bounds take `lower_bound`/`upper_bound`, and
/// [`MustLLOptions`](crate::must_set::MustLLOptions) takes its defaults from here.
#[derive(Clone, Debug)]
pub struct Configuration {
    /// Default reaction lower bound
    pub lower_bound: f64,
    /// Default reaction upper bound
    pub upper_bound: f64,
    /// Values with magnitude at or below this are treated as zero
    pub tolerance: f64,
    /// Constant used for big-M indicator linking, must be at least twice the largest
    /// flux bound magnitude of any model searched
    pub big_m: f64,
    /// Smallest objective improvement for a pair to be accepted
    pub min_improvement: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-07,
            big_m: 2000.,
            min_improvement: 0.1,
        }
    }
}

/// Read a copy of the current global configuration
///
/// A poisoned lock still holds valid plain data, so its contents are used.
pub fn current() -> Configuration {
    match CONFIGURATION.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
