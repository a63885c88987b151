//! Solver configuration.

/// The multivariate gcd engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Dense recursive interpolation (Brown).
    Brown,
    /// Sparse interpolation of `G` (Zippel).
    Zippel,
    /// Sparse interpolation of the cheapest of `G`, `Abar`, `Bbar`.
    Zippel2,
    /// Bivariate gcd lifted by multivariate Hensel lifting.
    Hensel,
}

impl Algorithm {
    /// Every engine, in the order used for dense inputs.
    pub const ALL: [Self; 4] = [Self::Brown, Self::Hensel, Self::Zippel2, Self::Zippel];
}

/// Configuration for the gcd solver.
#[derive(Clone, Debug)]
pub struct GcdConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Attempts to find one good evaluation point before giving up.
    pub point_retries: usize,
    /// Restarts of an engine after an unlucky image set.
    pub restarts: usize,
    /// Random univariate images used to bound the gcd degrees.
    pub stat_trials: usize,
    /// Inputs at least this dense prefer the dense engine.
    pub dense_threshold: f64,
    /// Unlucky or rejected images tolerated in one Brown interpolation.
    pub max_brown_images: usize,
    /// Tries this engine before the usual order.
    pub forced: Option<Algorithm>,
}

impl Default for GcdConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            point_retries: 16,
            restarts: 4,
            stat_trials: 2,
            dense_threshold: 0.3,
            max_brown_images: 64,
            forced: None,
        }
    }
}

impl GcdConfig {
    /// Default configuration with `algorithm` tried first.
    #[must_use]
    pub fn with_algorithm(algorithm: Algorithm) -> Self {
        Self {
            forced: Some(algorithm),
            ..Self::default()
        }
    }

    /// The engine order for inputs of the given density class.
    #[must_use]
    pub fn order(&self, dense: bool) -> Vec<Algorithm> {
        let base = if dense {
            [Algorithm::Brown, Algorithm::Hensel, Algorithm::Zippel2, Algorithm::Zippel]
        } else {
            [Algorithm::Zippel2, Algorithm::Zippel, Algorithm::Hensel, Algorithm::Brown]
        };
        let mut order = Vec::with_capacity(base.len());
        if let Some(forced) = self.forced {
            order.push(forced);
        }
        order.extend(base.into_iter().filter(|a| Some(*a) != self.forced));
        order
    }
}
