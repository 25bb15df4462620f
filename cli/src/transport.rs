//! Blocking `Transport` backed by ureq.

use todo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};
use tracing::debug;

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Statuses are returned as data so the core can interpret 4xx/5xx.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = req.method.as_str();
        let path = req.path;
        let result = match (req.method, req.body) {
            (HttpMethod::Get, _) => self.agent.get(&path).call(),
            (HttpMethod::Delete, _) => self.agent.delete(&path).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(&path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(&path).send_empty(),
            (HttpMethod::Patch, Some(body)) => self
                .agent
                .patch(&path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Patch, None) => self.agent.patch(&path).send_empty(),
        };

        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(method, %path, status, "response received");
        Ok(HttpResponse::new(status, body))
    }
}
