use tally_core::scoring::{ActionWeights, ScoringPolicy, TierWeights};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining in-flight requests after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT validation configuration.
    pub jwt: JwtConfig,
    /// Points-per-unit and weight tables used when awarding points.
    pub scoring: ScoringPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                       |
    /// | `SCORING_POINTS_PER_UNIT` | `1.0`                      |
    /// | `SCORING_TIER_WEIGHTS`    | built-in tier table        |
    /// | `SCORING_ACTION_WEIGHTS`  | built-in action table      |
    ///
    /// # Panics
    ///
    /// Panics on any malformed value so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let scoring = scoring_policy_from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            scoring,
        }
    }
}

/// Build the scoring policy from `SCORING_*` variables, falling back to the
/// built-in defaults for anything unset.
fn scoring_policy_from_env() -> ScoringPolicy {
    let defaults = ScoringPolicy::default();

    let points_per_unit = match std::env::var("SCORING_POINTS_PER_UNIT") {
        Ok(raw) => {
            let value: f64 = raw
                .trim()
                .parse()
                .expect("SCORING_POINTS_PER_UNIT must be a number");
            assert!(
                value.is_finite() && value >= 0.0,
                "SCORING_POINTS_PER_UNIT must be a non-negative number"
            );
            value
        }
        Err(_) => defaults.points_per_unit,
    };

    let tier_weights = std::env::var("SCORING_TIER_WEIGHTS")
        .map(|raw| TierWeights::parse(&raw).unwrap_or_else(|e| panic!("{e}")))
        .unwrap_or(defaults.tier_weights);

    let action_weights = std::env::var("SCORING_ACTION_WEIGHTS")
        .map(|raw| ActionWeights::parse(&raw).unwrap_or_else(|e| panic!("{e}")))
        .unwrap_or(defaults.action_weights);

    ScoringPolicy {
        points_per_unit,
        action_weights,
        tier_weights,
    }
}
