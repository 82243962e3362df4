//! Request types: what the caller describes, and what signing produces.

use bytes::Bytes;
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue, Method, Uri};

use crate::{Error, Result};

/// The body of an outgoing request.
#[derive(Debug, Clone, Default)]
pub enum Body {
    /// No body at all.
    #[default]
    Empty,
    /// A text body, hashed with a character-based cap.
    Text(String),
    /// A structured body. An object is form-encoded before signing and the
    /// encoded form becomes the wire body; any other JSON value is sent as
    /// its JSON text.
    Json(serde_json::Value),
    /// A raw binary body, hashed with a byte-based cap.
    Bytes(Bytes),
}

impl Body {
    /// Whether this body contributes a content hash on POST.
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Text(s) => s.is_empty(),
            Body::Json(_) => false,
            Body::Bytes(b) => b.is_empty(),
        }
    }
}

/// A request as described by the caller, before signing.
///
/// The path may be absolute (`https://...`) or relative to the credential's
/// host. Query parameters added via [`with_query`](Self::with_query) replace
/// any query string embedded in the path.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Body,
    pub(crate) headers_to_sign: Vec<String>,
}

impl OutgoingRequest {
    /// Create a request for the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: Body::Empty,
            headers_to_sign: Vec::new(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name: HeaderName = name.parse()?;
        let value: HeaderValue = value.parse()?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Add a query parameter. Parameters are serialized in insertion order.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Name the headers that participate in the signature, in order.
    ///
    /// Both sides must agree on this list; most Akamai APIs sign none.
    pub fn with_headers_to_sign<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers_to_sign = names.into_iter().map(Into::into).collect();
        self
    }
}

/// The output of signing: a fully resolved request carrying its
/// `Authorization` header. The caller's [`OutgoingRequest`] is not touched.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub(crate) method: Method,
    pub(crate) url: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Body,
    pub(crate) headers_to_sign: Vec<String>,
}

impl SignedRequest {
    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The absolute url the request targets.
    pub fn url(&self) -> &Uri {
        &self.url
    }

    /// All headers, including `Authorization`.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The `Authorization` header value, if the signer produced one.
    pub fn authorization(&self) -> Option<&HeaderValue> {
        self.headers.get(http::header::AUTHORIZATION)
    }

    /// The bytes that go on the wire. Never truncated, whatever the
    /// credential's `max_body` says about the content hash.
    pub fn body_bytes(&self) -> Bytes {
        match &self.body {
            Body::Empty => Bytes::new(),
            Body::Text(s) => Bytes::from(s.clone()),
            Body::Json(v) => Bytes::from(v.to_string()),
            Body::Bytes(b) => b.clone(),
        }
    }
}

/// Resolve the absolute url for a request against the credential host.
pub(crate) fn resolve_url(host: &str, path: &str, query: &[(String, String)]) -> Result<Uri> {
    let absolute = if path.starts_with("https://") || path.starts_with("http://") {
        path.to_string()
    } else {
        let base = host.trim_end_matches('/');
        match path {
            "" => format!("{base}/"),
            p if p.starts_with('/') => format!("{base}{p}"),
            p => format!("{base}/{p}"),
        }
    };

    let absolute = if query.is_empty() {
        absolute
    } else {
        // Explicit query parameters replace whatever the path carried.
        let without_query = match absolute.find('?') {
            Some(idx) => &absolute[..idx],
            None => absolute.as_str(),
        };
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in query {
            serializer.append_pair(k, v);
        }
        format!("{without_query}?{}", serializer.finish())
    };

    let uri: Uri = absolute.parse()?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(Error::request_invalid(format!(
            "cannot resolve an absolute url from host {host:?} and path {path:?}"
        )));
    }
    Ok(uri)
}
