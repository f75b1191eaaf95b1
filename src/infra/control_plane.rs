//! Control-plane HTTP client implementing the `ControlPlane` port with `ureq`.
//!
//! `ureq` is blocking, so every request is moved onto
//! `tokio::task::spawn_blocking`.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::{ControlPlane, UnitRegistration};
use crate::domain::EnvVar;

/// HTTP client for the platform API at `server_url`.
pub struct HttpControlPlane {
    agent: ureq::Agent,
    server_url: String,
    token: String,
}

impl HttpControlPlane {
    #[must_use]
    pub fn new(server_url: &str, token: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("deploy-agent/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            server_url: server_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn app_url(&self, app: &str, endpoint: &str) -> String {
        format!("{}/apps/{app}/{endpoint}", self.server_url)
    }

    fn authorization(&self) -> String {
        format!("bearer {}", self.token)
    }
}

impl ControlPlane for HttpControlPlane {
    async fn register_unit(
        &self,
        app: &str,
        registration: &UnitRegistration,
    ) -> Result<Vec<EnvVar>> {
        let url = self.app_url(app, "units/register");
        let agent = self.agent.clone();
        let authorization = self.authorization();
        let mut form: Vec<(&'static str, String)> = Vec::new();
        if let Some(hostname) = &registration.hostname {
            form.push(("hostname", hostname.clone()));
        }
        if let Some(customdata) = &registration.customdata {
            form.push(("customdata", customdata.clone()));
        }

        debug!(url = %url, "registering unit");
        let body = tokio::task::spawn_blocking(move || {
            let pairs: Vec<(&str, &str)> = form.iter().map(|(k, v)| (*k, v.as_str())).collect();
            let response = agent
                .post(&url)
                .set("Authorization", &authorization)
                .send_form(&pairs);
            read_body(response)
        })
        .await
        .context("spawn_blocking for register_unit")??;

        parse_envs(&body)
    }

    async fn report_diff(&self, app: &str, diff: &str) -> Result<()> {
        let url = self.app_url(app, "diff");
        let agent = self.agent.clone();
        let authorization = self.authorization();
        let diff = diff.to_string();

        debug!(url = %url, bytes = diff.len(), "reporting diff");
        tokio::task::spawn_blocking(move || {
            let response = agent
                .post(&url)
                .set("Authorization", &authorization)
                .set("Content-Type", "text/plain")
                .send_string(&diff);
            read_body(response).map(drop)
        })
        .await
        .context("spawn_blocking for report_diff")?
    }
}

/// Turn a ureq result into the response body, mapping failures to readable
/// errors.
fn read_body(response: Result<ureq::Response, ureq::Error>) -> Result<String> {
    match response {
        Ok(resp) => resp.into_string().context("reading response"),
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            let body = body.trim();
            if body.is_empty() {
                anyhow::bail!("HTTP {code}")
            }
            anyhow::bail!("HTTP {code}: {body}")
        }
        Err(ureq::Error::Transport(transport)) => {
            anyhow::bail!("cannot reach control plane: {transport}")
        }
    }
}

/// Decode the registration response. An empty body or `null` means no envs.
fn parse_envs(body: &str) -> Result<Vec<EnvVar>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let envs: Option<Vec<EnvVar>> =
        serde_json::from_str(body).context("invalid registration response")?;
    Ok(envs.unwrap_or_default())
}

/// Best-effort hostname of the unit: `$HOSTNAME`, then the kernel's idea of
/// it.
#[must_use]
pub fn unit_hostname() -> Option<String> {
    if let Ok(name) = std::env::var("HOSTNAME")
        && !name.trim().is_empty()
    {
        return Some(name.trim().to_string());
    }
    ["/proc/sys/kernel/hostname", "/etc/hostname"]
        .iter()
        .filter_map(|path| std::fs::read_to_string(path).ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
}
