//! Shared environment configuration for the `tl-prob` binaries.
//!
//! Consolidates `TL_PROB_PORT`, `TL_PROB_MAX_TABLE_CELLS`,
//! `TL_PROB_MAX_POINTS`, `RAYON_NUM_THREADS` and `RUST_LOG` reads.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::constants::{DEFAULT_MAX_POINTS, DEFAULT_MAX_TABLE_CELLS, DEFAULT_PORT};
use crate::engine::EngineConfig;

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();
}

/// Read `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`, default 8) and build
/// the global rayon pool. Tolerates an already-initialized pool.
/// Returns thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = env_parse("RAYON_NUM_THREADS")
        .or_else(|| env_parse("OMP_NUM_THREADS"))
        .unwrap_or(8);
    if rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .is_err()
    {
        info!("rayon pool already initialized");
    }
    info!(num_threads, "rayon threads");
    num_threads
}

/// Read `TL_PROB_PORT` (default 9000).
pub fn server_port() -> u16 {
    env_parse("TL_PROB_PORT").unwrap_or(DEFAULT_PORT)
}

/// Read `TL_PROB_MAX_TABLE_CELLS` (default [`DEFAULT_MAX_TABLE_CELLS`]).
pub fn max_table_cells() -> usize {
    env_parse("TL_PROB_MAX_TABLE_CELLS").unwrap_or(DEFAULT_MAX_TABLE_CELLS)
}

/// Read `TL_PROB_MAX_POINTS` (default [`DEFAULT_MAX_POINTS`]).
pub fn max_points() -> usize {
    env_parse("TL_PROB_MAX_POINTS").unwrap_or(DEFAULT_MAX_POINTS)
}

/// Engine limits from the environment.
pub fn engine_config() -> EngineConfig {
    EngineConfig {
        max_table_cells: max_table_cells(),
        max_points: max_points(),
    }
}
