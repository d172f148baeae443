//! Request extractors

use std::net::SocketAddr;

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRef, FromRequestParts, OriginalUri, Query},
    http::{request::Parts, HeaderMap},
};

use crate::error::AppError;
use crate::pipeline::RequestContext;

const FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "unknown";

/// Where the rate-limit identity of a request comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientSource {
    /// Socket peer only; forwarding headers are ignored
    #[default]
    Peer,
    /// First `X-Forwarded-For` hop, for deployments behind a trusted proxy
    ForwardedFor,
}

impl ClientSource {
    pub fn from_trust_proxy(trust_proxy: bool) -> Self {
        if trust_proxy {
            ClientSource::ForwardedFor
        } else {
            ClientSource::Peer
        }
    }
}

/// Client identity for rate limiting.
///
/// The forwarded hop (when trusted), then the peer address, then `"unknown"`.
pub fn client_key(parts: &Parts, source: ClientSource) -> String {
    let forwarded = match source {
        ClientSource::ForwardedFor => forwarded_for(&parts.headers),
        ClientSource::Peer => None,
    };

    forwarded
        .or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
    ClientSource: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|_| AppError::invalid("Invalid query string"))?;

        // Nested routers strip their prefix from `parts.uri`
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map(|OriginalUri(uri)| uri.path())
            .unwrap_or_else(|| parts.uri.path())
            .to_string();

        let source = ClientSource::from_ref(state);
        Ok(RequestContext::new(client_key(parts, source), path).with_query(query))
    }
}
