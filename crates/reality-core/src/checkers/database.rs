use crate::checker::{FailureKind, SourceCheckResult, SourceChecker};
use crate::config::{EnvConfig, ENV_DATABASE_URL};
use crate::types::source;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;

/// Probes the external database over HTTP. Point `REALITY_DATABASE_URL` at a
/// health or REST endpoint (for a Supabase project, `<project>/rest/v1/`);
/// `REALITY_DATABASE_KEY` is sent as the `apikey` header when present.
pub struct DatabaseChecker {
    url: Option<String>,
    key: Option<String>,
}

impl DatabaseChecker {
    pub fn new(url: Option<String>, key: Option<String>) -> Self {
        Self { url, key }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(config.database_url.clone(), config.database_key.clone())
    }
}

impl SourceChecker for DatabaseChecker {
    fn source(&self) -> &str {
        source::DATABASE
    }

    fn ready(&self) -> Result<(), String> {
        match self.url {
            Some(_) => Ok(()),
            None => Err(format!("{ENV_DATABASE_URL} not set")),
        }
    }

    fn probe(&self, budget: Duration) -> SourceCheckResult {
        let Some(url) = self.url.as_deref() else {
            return SourceCheckResult::unavailable(
                source::DATABASE,
                FailureKind::Error,
                format!("{ENV_DATABASE_URL} not set"),
            );
        };

        let client = match reqwest::blocking::Client::builder().timeout(budget).build() {
            Ok(c) => c,
            Err(e) => {
                return SourceCheckResult::unavailable(
                    source::DATABASE,
                    FailureKind::Error,
                    format!("failed to build http client: {e}"),
                )
            }
        };

        let mut request = client.get(url);
        if let Some(key) = &self.key {
            request = request.header("apikey", key);
        }

        match request.send() {
            Ok(response) => {
                let code = response.status().as_u16();
                if response.status().is_success() {
                    let mut facts = BTreeMap::new();
                    facts.insert("reachable".to_string(), json!(true));
                    facts.insert("http_status".to_string(), json!(code));
                    SourceCheckResult::observed(source::DATABASE, 1.0, facts)
                } else {
                    SourceCheckResult::unavailable(
                        source::DATABASE,
                        FailureKind::Error,
                        format!("database endpoint returned HTTP {code}"),
                    )
                }
            }
            Err(e) if e.is_timeout() => SourceCheckResult::unavailable(
                source::DATABASE,
                FailureKind::Timeout,
                format!("no response within {}s", budget.as_secs()),
            ),
            Err(e) => SourceCheckResult::unavailable(
                source::DATABASE,
                FailureKind::Error,
                format!("request failed: {e}"),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
