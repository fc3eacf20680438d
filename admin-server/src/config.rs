//! Admin server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration, loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format
    pub log_json: bool,
    /// Daily rolling log files are written here when set and present
    pub log_dir: Option<String>,
    /// HS256 secret for issued login tokens
    pub jwt_secret: String,
    /// Capacity of the in-process order event channel
    pub event_channel_capacity: usize,
    pub rules: LifecycleRules,
}

/// Tunable constants of the order lifecycle
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleRules {
    /// Random draws before the order number falls back to the timestamp form
    pub order_number_max_attempts: u32,
    /// Subtracted from `revisionScore` on every revision request (floor 0)
    pub revision_penalty: i32,
    pub initial_revision_score: i32,
    /// Share of the writer amount fined when an admin rejects a submission
    pub rejection_fine_percent: f64,
    /// Cost per page used when an order carries no `cpp` of its own
    pub default_cpp_kes: f64,
}

impl Default for LifecycleRules {
    fn default() -> Self {
        Self {
            order_number_max_attempts: 100,
            revision_penalty: 1,
            initial_revision_score: 10,
            rejection_fine_percent: 10.0,
            default_cpp_kes: 350.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "writers_admin.db".into(),
            http_port: 5001,
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            jwt_secret: "dev-JWT_SECRET-not-for-production".into(),
            event_channel_capacity: 256,
            rules: LifecycleRules::default(),
        }
    }
}

/// Parse an env var, falling back to `default` when unset or malformed
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let defaults = Self::default();
        let environment = std::env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let base_rules = LifecycleRules::default();

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            http_port: env_or("HTTP_PORT", defaults.http_port),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: env_or("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            event_channel_capacity: env_or("EVENT_CHANNEL_CAPACITY", defaults.event_channel_capacity)
                .max(1),
            rules: LifecycleRules {
                order_number_max_attempts: env_or(
                    "ORDER_NUMBER_MAX_ATTEMPTS",
                    base_rules.order_number_max_attempts,
                ),
                revision_penalty: env_or("REVISION_PENALTY", base_rules.revision_penalty).max(0),
                initial_revision_score: env_or(
                    "INITIAL_REVISION_SCORE",
                    base_rules.initial_revision_score,
                )
                .max(0),
                rejection_fine_percent: env_or(
                    "REJECTION_FINE_PERCENT",
                    base_rules.rejection_fine_percent,
                ),
                default_cpp_kes: env_or("DEFAULT_CPP_KES", base_rules.default_cpp_kes),
            },
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_secret_in_development_uses_placeholder() {
        let secret = Config::require_secret("ADMIN_SERVER_TEST_UNSET_SECRET", "development").unwrap();
        assert_eq!(secret, "dev-ADMIN_SERVER_TEST_UNSET_SECRET-not-for-production");
    }

    #[test]
    fn test_require_secret_outside_development_fails() {
        assert!(Config::require_secret("ADMIN_SERVER_TEST_UNSET_SECRET", "production").is_err());
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        assert_eq!(env_or("ADMIN_SERVER_TEST_UNSET_PORT", 5001u16), 5001);
    }

    #[test]
    fn test_default_rules() {
        let rules = LifecycleRules::default();
        assert_eq!(rules.initial_revision_score, 10);
        assert_eq!(rules.revision_penalty, 1);
        assert_eq!(rules.order_number_max_attempts, 100);
    }
}
