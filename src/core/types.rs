use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_INITIAL_INVESTMENT: f64 = 10_000.0;
pub const DEFAULT_YEARS: u32 = 30;
pub const DEFAULT_MEAN_RETURN: f64 = 0.07;
pub const DEFAULT_STD_DEV: f64 = 0.15;
pub const DEFAULT_SIMULATIONS: u32 = 1_000;

/// Parameters of one Monte Carlo run. Rates are fractions (0.07 = 7%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub initial_investment: f64,
    /// Compounding periods per trial, nominally years.
    pub years: u32,
    pub mean_return: f64,
    pub std_dev: f64,
    pub simulations: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_investment: DEFAULT_INITIAL_INVESTMENT,
            years: DEFAULT_YEARS,
            mean_return: DEFAULT_MEAN_RETURN,
            std_dev: DEFAULT_STD_DEV,
            simulations: DEFAULT_SIMULATIONS,
        }
    }
}

/// Terminal values of every trial, in trial order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub final_values: Vec<f64>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.final_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.final_values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub count: usize,
    pub median: f64,
    pub p10: f64,
    pub p90: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Share of trials that ended below the initial investment.
    pub probability_of_loss: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    pub median: f64,
    pub median_bin: Option<usize>,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid return distribution (mean {mean}, std dev {std_dev}): {reason}")]
    InvalidDistribution {
        mean: f64,
        std_dev: f64,
        reason: String,
    },
}
