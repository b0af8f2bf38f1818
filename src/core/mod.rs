mod engine;
mod histogram;
mod stats;
mod types;

pub use engine::{simulate, simulate_seeded};
pub use histogram::{DEFAULT_BINS, build_histogram};
pub use stats::{percentile, summarize};
pub use types::{
    DEFAULT_INITIAL_INVESTMENT, DEFAULT_MEAN_RETURN, DEFAULT_SIMULATIONS, DEFAULT_STD_DEV,
    DEFAULT_YEARS, Histogram, HistogramBin, ResultSet, SimulationConfig, SimulationError, Summary,
};
