use anyhow::Result;

use conhook_common::types::hook::Hook;

use crate::structs::{InfoResponse, ModifyHookRequest};

/// HTTP client for the daemon's control API, used by the CLI.
pub struct DaemonClient {
    base_uri: String,
    client: reqwest::Client,
}

impl DaemonClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_uri: base_url,
            client: reqwest::Client::new(),
        }
    }

    fn get_url(&self, path: &str) -> String {
        format!("{}{}", self.base_uri, path)
    }

    pub async fn list_hooks(&self) -> Result<Vec<Hook>> {
        let hooks = self
            .client
            .get(self.get_url("/hooks"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(hooks)
    }

    pub async fn create_hook(&self, hook: &Hook) -> Result<Hook> {
        let stored = self
            .client
            .put(self.get_url("/hooks"))
            .json(hook)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(stored)
    }

    pub async fn get_hook(&self, id: &str) -> Result<Hook> {
        let hook = self
            .client
            .get(self.get_url(&format!("/hooks/{id}")))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(hook)
    }

    pub async fn modify_hook(&self, id: &str, request: &ModifyHookRequest) -> Result<Hook> {
        let hook = self
            .client
            .post(self.get_url(&format!("/hooks/{id}")))
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(hook)
    }

    pub async fn delete_hook(&self, id: &str) -> Result<()> {
        self.client
            .delete(self.get_url(&format!("/hooks/{id}")))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn send_info_request(&self) -> Result<InfoResponse> {
        let info = self
            .client
            .get(self.get_url("/info"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(info)
    }

    pub async fn send_terminate_request(&self) -> Result<()> {
        self.client
            .post(self.get_url("/terminate"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
