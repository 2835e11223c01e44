use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Environment variable names
// ---------------------------------------------------------------------------

pub const ENV_DATABASE_URL: &str = "REALITY_DATABASE_URL";
pub const ENV_DATABASE_KEY: &str = "REALITY_DATABASE_KEY";
pub const ENV_DEPLOY_URL: &str = "REALITY_DEPLOY_URL";
pub const ENV_TASKS_FILE: &str = "REALITY_TASKS_FILE";
pub const ENV_TRUST_ORDER: &str = "REALITY_TRUST_ORDER";

// ---------------------------------------------------------------------------
// EnvConfig
// ---------------------------------------------------------------------------

/// Checker configuration pulled from the environment. A checker whose
/// required entries are `None` reports a configuration gap and is skipped,
/// never attempted.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub database_url: Option<String>,
    pub database_key: Option<String>,
    pub deploy_url: Option<String>,
    pub tasks_file: Option<PathBuf>,
    /// Comma-separated trust ordering, most trusted first.
    pub trust_order: Option<Vec<String>>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: non_empty(ENV_DATABASE_URL),
            database_key: non_empty(ENV_DATABASE_KEY),
            deploy_url: non_empty(ENV_DEPLOY_URL),
            tasks_file: non_empty(ENV_TASKS_FILE).map(PathBuf::from),
            trust_order: non_empty(ENV_TRUST_ORDER).map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        }
    }
}

fn non_empty(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_credentials() {
        let cfg = EnvConfig::default();
        assert!(cfg.database_url.is_none());
        assert!(cfg.deploy_url.is_none());
        assert!(cfg.tasks_file.is_none());
        assert!(cfg.trust_order.is_none());
    }

    #[test]
    fn trust_order_parsing_trims_and_drops_blanks() {
        // Parse the same way from_env does, without touching process env.
        let raw = "vcs, filesystem,,database ";
        let order: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        assert_eq!(order, vec!["vcs", "filesystem", "database"]);
    }
}
