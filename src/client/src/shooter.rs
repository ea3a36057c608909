use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tracing::info;

use conhook_common::types::reaction::Reaction;

use crate::format;

/// Performs one outbound delivery for a matched hook. Each `fire` call is a
/// single best-effort attempt: no retry, no queueing.
#[async_trait]
pub trait Shooter: Send + Sync {
    async fn fire(&self, reaction: &Reaction) -> Result<()>;
}

/// Delivers over HTTP POST to the hook's url.
pub struct LiveShooter {
    client: reqwest::Client,
}

impl LiveShooter {
    pub fn new() -> Self {
        LiveShooter {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for LiveShooter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Shooter for LiveShooter {
    async fn fire(&self, reaction: &Reaction) -> Result<()> {
        let Some(formatter) = format::for_body_format(reaction.hook.format) else {
            bail!("body format {:?} unsupported", reaction.hook.format);
        };

        let body = formatter.body(reaction).context("error formatting body")?;

        let response = self
            .client
            .post(&reaction.hook.url)
            .header(CONTENT_TYPE, formatter.content_type())
            .header(CONTENT_LENGTH, body.len())
            .body(body)
            .send()
            .await
            .context("couldn't execute webhook request")?;

        let status = response.status();
        if !status.is_success() {
            bail!("unexpected response status for hook shot: {}", status.as_u16());
        }

        Ok(())
    }
}

/// Dry-run shooter: logs the would-be delivery and succeeds.
pub struct LogShooter;

#[async_trait]
impl Shooter for LogShooter {
    async fn fire(&self, reaction: &Reaction) -> Result<()> {
        info!(
            hook.id = %reaction.hook.id,
            container = %reaction.container.name,
            "dry run, skipping delivery for hook {:?}",
            reaction.hook.name
        );
        Ok(())
    }
}
