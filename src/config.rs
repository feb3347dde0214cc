use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub oracle: OracleParams,
}

#[derive(Args, Debug, Clone)]
pub struct SearchParams {
    /// Maximum hill-climbing steps per restart.
    #[arg(long, default_value_t = 7)]
    pub step_budget: usize,

    /// Independent climbs per episode, the as-received board included.
    #[arg(long, default_value_t = 3)]
    pub restarts: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            step_budget: 7,
            restarts: 3,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct OracleParams {
    /// Total simulation samples per evaluated board.
    #[arg(long, default_value_t = 1000)]
    pub trials: usize,

    /// Simulator-internal worker threads.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub oracle_workers: u8,

    /// Per-call simulator timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub sim_timeout_secs: u64,
}

impl Default for OracleParams {
    fn default() -> Self {
        Self {
            trials: 1000,
            oracle_workers: 3,
            sim_timeout_secs: 30,
        }
    }
}
