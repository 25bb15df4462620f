//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse` and returns the decoded envelope. Whether
//! a `success: false` envelope is an error is decided by the caller (see
//! `EnvelopePolicy`), not here.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, ConfigError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Ack, CreateTodo, Envelope, RenameTodo, Todo, TodoId};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        get(self.base_url.clone())
    }

    pub fn build_create_todo(&self, title: &str) -> Result<HttpRequest, ApiError> {
        let input = CreateTodo {
            title: title.to_string(),
        };
        json_request(HttpMethod::Post, self.base_url.clone(), &input)
    }

    pub fn build_toggle_status(&self, id: TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Patch,
            path: format!("{}/{id}/status", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_rename_todo(&self, id: TodoId, title: &str) -> Result<HttpRequest, ApiError> {
        let input = RenameTodo {
            title: title.to_string(),
        };
        json_request(HttpMethod::Patch, format!("{}/{id}/title", self.base_url), &input)
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Envelope<Vec<Todo>>, ApiError> {
        decode(response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Envelope<Todo>, ApiError> {
        decode(response)
    }

    pub fn parse_toggle_status(&self, response: HttpResponse) -> Result<Envelope<Todo>, ApiError> {
        decode(response)
    }

    pub fn parse_rename_todo(&self, response: HttpResponse) -> Result<Envelope<Todo>, ApiError> {
        decode(response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<Ack, ApiError> {
        decode(response)
    }
}

/// Build the connectivity probe for a candidate base URL.
///
/// The candidate is used verbatim; only a validated URL becomes a
/// `TodoClient`.
pub fn build_probe(candidate: &str) -> HttpRequest {
    get(candidate.to_string())
}

/// Accept the probe response only if it is 2xx JSON with `success: true`.
pub fn parse_probe(response: HttpResponse) -> Result<(), ConfigError> {
    if !response.is_success() {
        return Err(ConfigError::ConnectionFailed(ApiError::HttpError {
            status: response.status,
            body: response.body,
        }));
    }
    let value: serde_json::Value = match serde_json::from_str(&response.body) {
        Ok(value) => value,
        Err(_) if looks_like_html(&response.body) => return Err(ConfigError::InvalidUrl),
        Err(e) => {
            return Err(ConfigError::Unreachable(ApiError::DeserializationError(e.to_string())))
        }
    };
    match value.get("success") {
        Some(serde_json::Value::Bool(true)) => Ok(()),
        _ => Err(ConfigError::InvalidResponse),
    }
}

fn looks_like_html(body: &str) -> bool {
    body.to_ascii_lowercase().contains("<!doctype")
}

fn get(path: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        path,
        headers: Vec::new(),
        body: None,
    }
}

fn json_request<T: Serialize>(method: HttpMethod, path: String, input: &T) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Map non-2xx statuses to `HttpError`, then decode the body.
fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(ApiError::HttpError {
            status: response.status,
            body: response.body,
        });
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
