//! The request entity that gets dumped to and parsed from wire bytes.
//!
//! Unlike `http::Request`, a [`WireRequest`] keeps the request target exactly as it
//! appears on the request line, keeps the `Host` authority apart from the other
//! headers, and stores headers in their original order and spelling.

use bytes::Bytes;
use http::uri::Uri;
use http::{Method, Request, Version};

use crate::protocol::{EncodeError, HeaderList, ReqBody};

pub(crate) const HOST: &str = "Host";
pub(crate) const CONTENT_LENGTH: &str = "Content-Length";

/// An HTTP/1.1 request held in memory.
#[derive(Debug)]
pub struct WireRequest {
    method: Method,
    target: String,
    host: String,
    headers: HeaderList,
    body: ReqBody,
}

impl WireRequest {
    /// Creates a request with no host, no headers and no body.
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self { method, target: target.into(), host: String::new(), headers: HeaderList::new(), body: ReqBody::empty() }
    }

    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Shortcut for a bodyless GET to an absolute uri such as `http://test.test/test`.
    pub fn get<T>(uri: T) -> Result<Self, http::Error>
    where
        Uri: TryFrom<T>,
        <Uri as TryFrom<T>>::Error: Into<http::Error>,
    {
        Builder::new().method(Method::GET).uri(uri).build()
    }

    /// Shortcut for a POST to an absolute uri with the given body.
    pub fn post<T>(uri: T, body: impl Into<ReqBody>) -> Result<Self, http::Error>
    where
        Uri: TryFrom<T>,
        <Uri as TryFrom<T>>::Error: Into<http::Error>,
    {
        Builder::new().method(Method::POST).uri(uri).body(body).build()
    }

    pub(crate) fn from_parts(method: Method, target: String, host: String, headers: HeaderList) -> Self {
        Self { method, target, host, headers, body: ReqBody::empty() }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request target exactly as written on the request line.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn set_target(&mut self, target: impl Into<String>) {
        self.target = target.into();
    }

    /// Always HTTP/1.1, the only version this crate reads or writes.
    pub fn version(&self) -> Version {
        Version::HTTP_11
    }

    /// The authority sent in the `Host` header, empty when unset.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    /// Headers other than `Host`.
    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderList {
        &mut self.headers
    }

    pub fn body(&self) -> &ReqBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut ReqBody {
        &mut self.body
    }

    pub fn set_body(&mut self, body: impl Into<ReqBody>) {
        self.body = body.into();
    }

    /// Path part of the target, without the query.
    pub fn path(&self) -> &str {
        match self.target.split_once('?') {
            Some((path, _)) => path,
            None => &self.target,
        }
    }

    /// Query part of the target, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.target.split_once('?').map(|(_, query)| query)
    }

    /// Percent-decoded query pairs in the order they appear.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>, serde_urlencoded::de::Error> {
        match self.query() {
            Some(query) => serde_urlencoded::from_str(query),
            None => Ok(Vec::new()),
        }
    }

    /// First decoded value of the query parameter `name`.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query_pairs().ok()?.into_iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Resolves the target against `scheme://host`, producing a uri a client can dial.
    ///
    /// Targets already in absolute form are returned as they are.
    pub fn absolute_uri(&self, scheme: &str) -> Result<Uri, http::Error> {
        let target: Uri = self.target.parse()?;
        if target.scheme().is_some() {
            return Ok(target);
        }

        let mut builder = Uri::builder().scheme(scheme).authority(self.host.as_str());
        if let Some(path_and_query) = target.path_and_query() {
            builder = builder.path_and_query(path_and_query.clone());
        }
        builder.build()
    }

    /// Converts into an `http::Request`, draining the body into memory first.
    ///
    /// The target is kept as the request uri, so a client still has to resolve it
    /// against a base authority (see [`WireRequest::absolute_uri`]).
    pub fn into_http_request(mut self) -> Result<Request<Bytes>, EncodeError> {
        crate::codec::normalize(&mut self)?;

        let mut builder = Request::builder().method(self.method).uri(self.target.as_str()).version(Version::HTTP_11);
        if !self.host.is_empty() {
            builder = builder.header(http::header::HOST, self.host.as_str());
        }
        for field in &self.headers {
            builder = builder.header(field.name(), field.value());
        }

        let body = self.body.as_bytes().cloned().unwrap_or_default();
        Ok(builder.body(body)?)
    }
}

/// Captures a request built with the `http` crate, e.g. the one a server handler received.
///
/// `http::HeaderMap` only keeps lowercase names, so that is the spelling that gets dumped.
impl<B: Into<Bytes>> From<Request<B>> for WireRequest {
    fn from(request: Request<B>) -> Self {
        let (parts, body) = request.into_parts();

        let target = parts.uri.path_and_query().map(|pq| pq.as_str()).filter(|pq| !pq.is_empty()).unwrap_or("/").to_string();

        let host = match parts.headers.get(http::header::HOST) {
            Some(value) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
            None => parts.uri.authority().map(|authority| authority.as_str().to_string()).unwrap_or_default(),
        };

        let headers = parts
            .headers
            .iter()
            .filter(|(name, _)| **name != http::header::HOST)
            .map(|(name, value)| (name.as_str(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
            .collect();

        Self { method: parts.method, target, host, headers, body: ReqBody::from(body.into()) }
    }
}

/// Builder for [`WireRequest`], errors are deferred until [`Builder::build`].
#[derive(Debug)]
pub struct Builder {
    inner: Result<WireRequest, http::Error>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method<T>(self, method: T) -> Self
    where
        Method: TryFrom<T>,
        <Method as TryFrom<T>>::Error: Into<http::Error>,
    {
        self.and_then(move |mut request| {
            request.method = Method::try_from(method).map_err(Into::<http::Error>::into)?;
            Ok(request)
        })
    }

    /// Sets host and target from a uri.
    ///
    /// An absolute uri fills in the host from its authority. The target becomes the path
    /// and query, `/` when the uri has no path.
    pub fn uri<T>(self, uri: T) -> Self
    where
        Uri: TryFrom<T>,
        <Uri as TryFrom<T>>::Error: Into<http::Error>,
    {
        self.and_then(move |mut request| {
            let uri = Uri::try_from(uri).map_err(Into::<http::Error>::into)?;
            if let Some(authority) = uri.authority() {
                request.host = authority.as_str().to_string();
            }
            request.target =
                uri.path_and_query().map(|pq| pq.as_str()).filter(|pq| !pq.is_empty()).unwrap_or("/").to_string();
            Ok(request)
        })
    }

    /// Sets the raw request target, e.g. `*` or `/search?q=1`.
    pub fn target(self, target: impl Into<String>) -> Self {
        let target = target.into();
        self.and_then(move |mut request| {
            request.target = target;
            Ok(request)
        })
    }

    pub fn host(self, host: impl Into<String>) -> Self {
        let host = host.into();
        self.and_then(move |mut request| {
            request.host = host;
            Ok(request)
        })
    }

    /// Appends a header. A `Host` header sets the host instead.
    pub fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let (name, value) = (name.into(), value.into());
        self.and_then(move |mut request| {
            if name.eq_ignore_ascii_case(HOST) {
                request.host = value;
            } else {
                request.headers.append(name, value);
            }
            Ok(request)
        })
    }

    pub fn body(self, body: impl Into<ReqBody>) -> Self {
        let body = body.into();
        self.and_then(move |mut request| {
            request.body = body;
            Ok(request)
        })
    }

    pub fn build(self) -> Result<WireRequest, http::Error> {
        self.inner
    }

    fn and_then<F>(self, func: F) -> Self
    where
        F: FnOnce(WireRequest) -> Result<WireRequest, http::Error>,
    {
        Self { inner: self.inner.and_then(func) }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self { inner: Ok(WireRequest::new(Method::GET, "/")) }
    }
}
