use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::debug;

use super::types::{ResultSet, SimulationConfig, SimulationError};

/// Runs `config.simulations` independent trials, drawing every annual return
/// from `rng`. Terminal values come back in trial order.
pub fn simulate<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<ResultSet, SimulationError> {
    debug!(
        simulations = config.simulations,
        years = config.years,
        mean_return = config.mean_return,
        std_dev = config.std_dev,
        "running monte carlo"
    );

    let mut final_values = Vec::with_capacity(config.simulations as usize);
    if config.years == 0 {
        final_values.resize(config.simulations as usize, config.initial_investment);
        return Ok(ResultSet { final_values });
    }

    let annual_return = return_distribution(config)?;
    for _ in 0..config.simulations {
        final_values.push(simulate_trial(config, &annual_return, rng));
    }

    Ok(ResultSet { final_values })
}

pub fn simulate_seeded(config: &SimulationConfig, seed: u64) -> Result<ResultSet, SimulationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    simulate(config, &mut rng)
}

fn return_distribution(config: &SimulationConfig) -> Result<Normal<f64>, SimulationError> {
    let invalid = |reason: String| SimulationError::InvalidDistribution {
        mean: config.mean_return,
        std_dev: config.std_dev,
        reason,
    };

    // rand_distr 0.4 accepts a negative std dev.
    if config.std_dev.is_nan() || config.std_dev < 0.0 {
        return Err(invalid("std dev must be a non-negative number".to_string()));
    }
    Normal::new(config.mean_return, config.std_dev).map_err(|e| invalid(e.to_string()))
}

fn simulate_trial<R: Rng + ?Sized>(
    config: &SimulationConfig,
    annual_return: &Normal<f64>,
    rng: &mut R,
) -> f64 {
    let mut portfolio_value = config.initial_investment;
    for _ in 0..config.years {
        // Returns below -100% are kept; the value then changes sign.
        portfolio_value *= 1.0 + annual_return.sample(rng);
    }
    portfolio_value
}
