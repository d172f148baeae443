//! Request Pipeline
//!
//! Every API request runs the same stages in order:
//!
//! 1. admission against each of the route's limiter classes
//! 2. input validation
//! 3. cache lookup (cached routes only)
//! 4. the route handler
//! 5. cache store of the successful result
//!
//! A stage that fails ends the request; later stages never run. Failures
//! are rendered once, by [`Pipeline::respond`].

use std::future::Future;

use axum::{response::Response, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheKey, ResponseCache, TtlClass};
use crate::error::{AppError, Result};
use crate::limiter::{RateLimiter, RouteClass};

// == Request Context ==
/// What the pipeline needs to know about the incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Client identity used for rate limiting
    pub client_key: String,
    pub path: String,
    /// Query pairs in arrival order
    pub query: Vec<(String, String)>,
}

impl RequestContext {
    pub fn new(client_key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            client_key: client_key.into(),
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Cache key: path plus query, independent of parameter order.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::from_request(&self.path, &self.query)
    }
}

// == Route Policy ==
/// Per-route limiter classes and cache lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePolicy {
    /// Checked in order; the first rejection wins
    pub classes: &'static [RouteClass],
    /// `None` for routes that are never cached
    pub ttl: Option<TtlClass>,
}

impl RoutePolicy {
    pub const fn cached(classes: &'static [RouteClass], ttl: TtlClass) -> Self {
        Self {
            classes,
            ttl: Some(ttl),
        }
    }

    pub const fn uncached(classes: &'static [RouteClass]) -> Self {
        Self { classes, ttl: None }
    }
}

// == Pipeline ==
#[derive(Clone)]
pub struct Pipeline {
    limiter: RateLimiter,
    cache: ResponseCache,
    /// Adds error detail to failure bodies outside production
    expose_error_detail: bool,
}

impl Pipeline {
    pub fn new(limiter: RateLimiter, cache: ResponseCache, expose_error_detail: bool) -> Self {
        Self {
            limiter,
            cache,
            expose_error_detail,
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Runs one request through admission, validation, cache and handler.
    ///
    /// `validate` turns raw input into typed parameters; the handler only
    /// ever sees validated input. Failed results are never cached.
    pub async fn execute<T, V, H, Fut>(
        &self,
        request: &RequestContext,
        policy: &RoutePolicy,
        validate: V,
        handler: H,
    ) -> Result<Value>
    where
        V: FnOnce() -> Result<T>,
        H: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        for class in policy.classes {
            self.limiter.admit(&request.client_key, *class)?;
        }

        let params = validate()?;

        let Some(ttl) = policy.ttl else {
            return handler(params).await;
        };

        let key = request.cache_key();
        if let Some(hit) = self.cache.get(&key).await {
            debug!(key = %key, "cache hit");
            return Ok(hit);
        }

        let value = handler(params).await?;
        self.cache.set(key, value.clone(), ttl.seconds()).await;
        Ok(value)
    }

    /// Renders a pipeline outcome as the HTTP response.
    pub fn respond(&self, outcome: Result<Value>) -> Response {
        match outcome {
            Ok(body) => axum::response::IntoResponse::into_response(Json(body)),
            Err(err) => err.to_response(self.expose_error_detail),
        }
    }
}

/// Serializes a handler result for caching and rendering.
pub fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::internal(format!("Failed to serialize response: {e}")))
}
