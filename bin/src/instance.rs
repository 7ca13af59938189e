//! Archive instance resolution and selection.

use anyhow::{Context, Result, bail};
use chatgrep_lib::prelude::*;
use chatgrep_lib::ArchiveChannel;
use clap::Args;

/// Environment variable holding whitespace-separated default instances.
pub(crate) const DEFAULT_INSTANCES_ENV: &str = "CHATGREP_DEFAULT_INSTANCES";

/// Instance used when neither `--url` nor the environment names one.
pub(crate) const FALLBACK_INSTANCE: &str = "http://localhost:8025";

/// Where to look for archive instances.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct InstanceArgs {
    /// Archive instance base URL (overrides the defaults)
    #[arg(long)]
    pub url: Option<String>,

    /// Ignore CHATGREP_DEFAULT_INSTANCES
    #[arg(long)]
    pub no_env: bool,
}

impl InstanceArgs {
    /// The candidate instances, in preference order.
    pub(crate) fn candidates(&self) -> Vec<String> {
        let env = if self.no_env {
            None
        } else {
            std::env::var(DEFAULT_INSTANCES_ENV).ok()
        };
        self.candidates_with(env.as_deref())
    }

    fn candidates_with(&self, env: Option<&str>) -> Vec<String> {
        if let Some(url) = &self.url {
            return vec![url.clone()];
        }

        let from_env: Vec<String> = env
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        if from_env.is_empty() {
            vec![FALLBACK_INSTANCE.to_string()]
        } else {
            from_env
        }
    }
}

/// Strips credentials from an instance URL before it is printed.
pub(crate) fn redact(instance: &str) -> String {
    match url::Url::parse(instance) {
        Ok(mut parsed) => {
            if !parsed.username().is_empty() {
                let _ = parsed.set_username("redacted");
            }
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("redacted"));
            }
            parsed.to_string()
        }
        Err(_) => "[invalid url]".to_string(),
    }
}

/// Lists the channels an instance logs.
pub(crate) async fn fetch_channels(
    client: &ArchiveClient,
    instance: &str,
) -> Result<Vec<ArchiveChannel>> {
    client
        .channels(instance)
        .await
        .with_context(|| format!("failed to list channels of {}", redact(instance)))
}

/// Picks the first instance that logs every requested channel.
pub(crate) async fn select_instance(
    client: &ArchiveClient,
    candidates: &[String],
    wanted: &[String],
) -> Result<String> {
    for instance in candidates {
        let available = match client.channels(instance).await {
            Ok(available) => available,
            Err(e) => {
                tracing::warn!(instance = %redact(instance), error = %e, "Instance unavailable");
                continue;
            }
        };

        let missing: Vec<&String> = wanted
            .iter()
            .filter(|name| !available.iter().any(|c| c.name.eq_ignore_ascii_case(name)))
            .collect();

        if missing.is_empty() {
            tracing::debug!(instance = %redact(instance), "Selected instance");
            return Ok(instance.clone());
        }
        tracing::info!(instance = %redact(instance), ?missing, "Instance lacks channels");
    }

    let tried: Vec<String> = candidates.iter().map(|c| redact(c)).collect();
    bail!(
        "no instance logs all of [{}] (tried: {})",
        wanted.join(", "),
        tried.join(", ")
    )
}
