//! Request building
//!
//! Turns a resource path, query parameters and an optional body into a
//! ready-to-send request. Every call builds its own target from the shared,
//! read-only [`ClientConfig`]; nothing here mutates client state.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

const APPLICATION_JSON: &str = "application/json";

/// Fully-qualified URL of a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    url: Url,
}

impl RequestTarget {
    /// Builds the target for `path` under the configured prefix
    ///
    /// Path segments are taken literally: a `%` in a job name is sent as
    /// `%25`. Parameters are appended after any query already on the base
    /// URL, in the order given.
    pub fn new(config: &ClientConfig, path: &str, params: &[(&str, &str)]) -> Self {
        let mut url = config.base_url.clone();
        // set_path treats `%` as an existing escape and encodes everything else
        url.set_path(&join_path(&config.api_prefix, path).replace('%', "%25"));

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn into_url(self) -> Url {
        self.url
    }
}

/// Joins the API prefix and a resource path
///
/// Empty elements are skipped and the result is lexically cleaned: repeated
/// slashes collapse, `.` segments drop, `..` removes the previous segment
/// and a trailing slash is stripped.
pub fn join_path(prefix: &str, path: &str) -> String {
    let joined = [prefix, path]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if joined.is_empty() {
        return joined;
    }

    clean_path(&joined)
}

fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            _ => segments.push(segment),
        }
    }

    let cleaned = segments.join("/");
    match (rooted, cleaned.is_empty()) {
        (true, _) => format!("/{}", cleaned),
        (false, true) => ".".to_string(),
        (false, false) => cleaned,
    }
}

/// Serializes a request body, before any network I/O happens
pub fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(ClientError::Serialization)
}

/// Assembles the transport request with JSON headers and basic auth
pub fn build_request(
    http: &Client,
    config: &ClientConfig,
    method: Method,
    target: RequestTarget,
    body: Option<Vec<u8>>,
) -> RequestBuilder {
    let request = http
        .request(method, target.into_url())
        .header(CONTENT_TYPE, APPLICATION_JSON)
        .header(ACCEPT, APPLICATION_JSON)
        .basic_auth(
            &config.basic_auth.username,
            Some(&config.basic_auth.password),
        );

    match body {
        Some(body) => request.body(body),
        None => request,
    }
}
