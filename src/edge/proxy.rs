//! Reverse Proxy
//!
//! Requests under a proxied prefix are rebuilt against the upstream origin
//! by [`outbound_request`], a pure function, and then sent by [`forward`].
//! The upstream response is relayed unchanged apart from hop-by-hop
//! headers.

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, State},
    http::{
        header::{CONNECTION, CONTENT_LENGTH, HOST},
        HeaderMap, HeaderName, HeaderValue, Method, Uri,
    },
    response::Response,
};
use reqwest::Url;
use std::sync::Arc;

use super::error::{EdgeError, EdgeResult};
use super::state::EdgeState;

/// Headers that describe a single connection and are never forwarded
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Header names listed in `Connection`, which are also connection-scoped
fn connection_listed(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Copy end-to-end headers from `from`, skipping hop-by-hop ones and any in `skip`
fn copy_end_to_end(from: &HeaderMap, to: &mut HeaderMap, skip: &[HeaderName]) {
    let listed = connection_listed(from);

    for (name, value) in from {
        if is_hop_by_hop(name) || skip.contains(name) || listed.iter().any(|l| l == name.as_str()) {
            continue;
        }
        to.append(name.clone(), value.clone());
    }
}

/// `host[:port]` of the upstream, used as the rewritten `Host` header
pub fn upstream_authority(upstream: &Url) -> Option<String> {
    let host = upstream.host_str()?;
    Some(match upstream.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Build the request sent upstream for an inbound request
///
/// The path and query are appended to the upstream origin, end-to-end
/// headers and the body are kept, and `Host` is set to the upstream
/// authority. No I/O happens here.
pub fn outbound_request(
    upstream: &Url,
    method: Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Bytes,
) -> EdgeResult<reqwest::Request> {
    let mut url = upstream.clone();
    let base_path = upstream.path().trim_end_matches('/');
    url.set_path(&format!("{}{}", base_path, uri.path()));
    url.set_query(uri.query());

    let authority = upstream_authority(upstream)
        .ok_or_else(|| EdgeError::Internal(format!("Upstream {} has no host", upstream)))?;
    let host = HeaderValue::from_str(&authority)
        .map_err(|e| EdgeError::Internal(format!("Invalid upstream host {}: {}", authority, e)))?;

    let mut request = reqwest::Request::new(method, url);
    copy_end_to_end(headers, request.headers_mut(), &[HOST, CONTENT_LENGTH]);
    request.headers_mut().insert(HOST, host);

    if !body.is_empty() {
        *request.body_mut() = Some(reqwest::Body::from(body));
    }

    Ok(request)
}

/// Turn an upstream response into the response sent to the caller
pub async fn relay_response(upstream: reqwest::Response) -> EdgeResult<Response> {
    let status = upstream.status();
    let mut headers = HeaderMap::new();
    copy_end_to_end(upstream.headers(), &mut headers, &[CONTENT_LENGTH]);

    let body = upstream.bytes().await?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Handler for every path under a proxied prefix
///
/// The inbound body is buffered up to the route's `DefaultBodyLimit`.
pub async fn forward(
    State(state): State<Arc<EdgeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> EdgeResult<Response> {
    let body = body?;

    let outbound = outbound_request(&state.upstream, method.clone(), &uri, &headers, body)?;
    tracing::debug!(method = %method, url = %outbound.url(), "Forwarding request upstream");

    let upstream = state.client.execute(outbound).await.map_err(|e| {
        tracing::warn!(method = %method, uri = %uri, error = %e, "Upstream request failed");
        EdgeError::from(e)
    })?;

    relay_response(upstream).await
}
