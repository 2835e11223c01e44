use crate::checker::{FailureKind, SourceCheckResult, SourceChecker};
use crate::config::{EnvConfig, ENV_DEPLOY_URL};
use crate::types::source;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;

/// Probes the live deployment target named by `REALITY_DEPLOY_URL`.
/// Redirects are not followed: a redirecting deployment is alive but not
/// serving the expected surface, so it reports at reduced confidence.
pub struct DeploymentChecker {
    url: Option<String>,
}

impl DeploymentChecker {
    pub fn new(url: Option<String>) -> Self {
        Self { url }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(config.deploy_url.clone())
    }
}

impl SourceChecker for DeploymentChecker {
    fn source(&self) -> &str {
        source::DEPLOYMENT
    }

    fn ready(&self) -> Result<(), String> {
        match self.url {
            Some(_) => Ok(()),
            None => Err(format!("{ENV_DEPLOY_URL} not set")),
        }
    }

    fn probe(&self, budget: Duration) -> SourceCheckResult {
        let Some(url) = self.url.as_deref() else {
            return SourceCheckResult::unavailable(
                source::DEPLOYMENT,
                FailureKind::Error,
                format!("{ENV_DEPLOY_URL} not set"),
            );
        };

        let client = match reqwest::blocking::Client::builder()
            .timeout(budget)
            .redirect(reqwest::redirect::Policy::none())
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                return SourceCheckResult::unavailable(
                    source::DEPLOYMENT,
                    FailureKind::Error,
                    format!("failed to build http client: {e}"),
                )
            }
        };

        match client.get(url).send() {
            Ok(response) => {
                let status = response.status();
                let code = status.as_u16();
                if status.is_success() || status.is_redirection() {
                    let mut facts = BTreeMap::new();
                    facts.insert("deployment_live".to_string(), json!(true));
                    facts.insert("http_status".to_string(), json!(code));
                    let confidence = if status.is_success() { 1.0 } else { 0.7 };
                    SourceCheckResult::observed(source::DEPLOYMENT, confidence, facts)
                } else {
                    SourceCheckResult::unavailable(
                        source::DEPLOYMENT,
                        FailureKind::Error,
                        format!("deployment returned HTTP {code}"),
                    )
                }
            }
            Err(e) if e.is_timeout() => SourceCheckResult::unavailable(
                source::DEPLOYMENT,
                FailureKind::Timeout,
                format!("no response within {}s", budget.as_secs()),
            ),
            Err(e) => SourceCheckResult::unavailable(
                source::DEPLOYMENT,
                FailureKind::Error,
                format!("request failed: {e}"),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
