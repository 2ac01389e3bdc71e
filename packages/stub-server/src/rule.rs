//! Stub rules: a method and path pattern mapped to a fixed response.

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use bytes::Bytes;
use regex::Regex;

use crate::error::{Result, StubError};

/// How a rule matches the request path. The query string is never considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Path must equal this string exactly.
    Exact(String),
    /// Path must match this regular expression in full.
    Regex(String),
}

impl PathPattern {
    pub fn exact(path: impl Into<String>) -> Self {
        Self::Exact(path.into())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex(pattern.into())
    }
}

/// A single request-pattern-to-response mapping.
///
/// Rules are plain data until the server compiles them, so pattern and header
/// errors surface from [`crate::StubServer::start`].
#[derive(Debug, Clone)]
pub struct StubRule {
    method: Method,
    pattern: PathPattern,
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl StubRule {
    /// Create a rule answering `200` with an empty body.
    pub fn new(method: Method, pattern: PathPattern) -> Self {
        Self {
            method,
            pattern,
            status: 200,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn get(pattern: PathPattern) -> Self {
        Self::new(Method::GET, pattern)
    }

    pub fn post(pattern: PathPattern) -> Self {
        Self::new(Method::POST, pattern)
    }

    pub fn patch(pattern: PathPattern) -> Self {
        Self::new(Method::PATCH, pattern)
    }

    pub fn delete(pattern: PathPattern) -> Self {
        Self::new(Method::DELETE, pattern)
    }

    /// Set the response status code.
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Append a response header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a raw response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a JSON response body and the matching `Content-Type` header.
    pub fn json_body(self, value: serde_json::Value) -> Self {
        self.header("content-type", "application/json")
            .body(value.to_string())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub(crate) fn compile(&self) -> Result<CompiledRule> {
        let matcher = match &self.pattern {
            PathPattern::Exact(path) => Matcher::Exact(path.clone()),
            PathPattern::Regex(pattern) => {
                // Anchor so the whole path has to match
                let anchored = format!("^(?:{})$", pattern);
                let regex = Regex::new(&anchored).map_err(|source| StubError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                Matcher::Regex(regex)
            }
        };

        let status =
            StatusCode::from_u16(self.status).map_err(|_| StubError::InvalidStatus(self.status))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| StubError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| StubError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            headers.append(header_name, header_value);
        }

        Ok(CompiledRule {
            method: self.method.clone(),
            matcher,
            status,
            headers,
            body: self.body.clone(),
        })
    }
}

#[derive(Debug)]
enum Matcher {
    Exact(String),
    Regex(Regex),
}

/// A validated rule ready to answer requests.
#[derive(Debug)]
pub(crate) struct CompiledRule {
    method: Method,
    matcher: Matcher,
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

impl CompiledRule {
    pub(crate) fn matches(&self, method: &Method, path: &str) -> bool {
        if &self.method != method {
            return false;
        }
        match &self.matcher {
            Matcher::Exact(expected) => expected == path,
            Matcher::Regex(regex) => regex.is_match(path),
        }
    }
}
