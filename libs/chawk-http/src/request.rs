use crate::client::{BufferedService, map_buffer_error, try_acquire_buffer_slot};
use crate::config::TransportSecurity;
use crate::error::{InvalidUrlKind, RestError};
use crate::response::RestResponse;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{Method, Request};
use http_body_util::Full;
use serde::Serialize;
use tower::Service;

#[derive(Debug)]
enum Payload {
    Empty,
    Json(Bytes),
    Form(Bytes),
}

impl Payload {
    fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Json(_) => Some("application/json"),
            Self::Form(_) => Some("application/x-www-form-urlencoded"),
        }
    }

    fn into_bytes(self) -> Bytes {
        match self {
            Self::Empty => Bytes::new(),
            Self::Json(b) | Self::Form(b) => b,
        }
    }
}

/// A request under construction, created by [`RestClient`](crate::RestClient).
///
/// Header errors are kept until [`send`](Self::send) (or the next body
/// setter) so calls can be chained without intermediate `?`.
#[must_use = "a RestRequest does nothing until .send() is awaited"]
pub struct RestRequest {
    service: BufferedService,
    max_body_size: usize,
    method: Method,
    url: String,
    headers: Vec<(HeaderName, HeaderValue)>,
    payload: Payload,
    error: Option<RestError>,
    transport_security: TransportSecurity,
}

impl RestRequest {
    pub(crate) fn new(
        service: BufferedService,
        max_body_size: usize,
        method: Method,
        url: String,
        transport_security: TransportSecurity,
    ) -> Self {
        Self {
            service,
            max_body_size,
            method,
            url,
            headers: Vec::new(),
            payload: Payload::Empty,
            error: None,
            transport_security,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => self.headers.push((name, value)),
            (Err(e), _) => self.error = Some(RestError::InvalidHeaderName(e)),
            (_, Err(e)) => self.error = Some(RestError::InvalidHeaderValue(e)),
        }
        self
    }

    /// Add a header whose value must not show up in debug output (credentials).
    pub fn sensitive_header(mut self, name: HeaderName, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        match HeaderValue::try_from(value) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.push((name, value));
            }
            Err(e) => self.error = Some(RestError::InvalidHeaderValue(e)),
        }
        self
    }

    /// Serialize `body` as the JSON payload.
    ///
    /// # Errors
    /// Returns a deferred header error or [`RestError::Json`].
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, RestError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.payload = Payload::Json(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// URL-encode `fields` as the payload.
    ///
    /// # Errors
    /// Returns a deferred header error or [`RestError::FormEncode`].
    pub fn form(mut self, fields: &[(&str, &str)]) -> Result<Self, RestError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.payload = Payload::Form(Bytes::from(serde_urlencoded::to_string(fields)?));
        Ok(self)
    }

    fn validate_url(&self) -> Result<http::Uri, RestError> {
        let uri: http::Uri = self.url.parse().map_err(|e: http::uri::InvalidUri| {
            RestError::InvalidUrl {
                url: self.url.clone(),
                kind: InvalidUrlKind::Malformed,
                reason: e.to_string(),
            }
        })?;

        if uri.authority().is_none() {
            return Err(RestError::InvalidUrl {
                url: self.url.clone(),
                kind: InvalidUrlKind::MissingHost,
                reason: "missing host".to_owned(),
            });
        }

        match (uri.scheme_str(), self.transport_security) {
            (Some("https"), _) | (Some("http"), TransportSecurity::AllowInsecureHttp) => Ok(uri),
            (Some("http"), TransportSecurity::TlsOnly) => Err(RestError::InvalidScheme {
                scheme: "http".to_owned(),
                reason: "HTTPS required".to_owned(),
            }),
            (Some(other), _) => Err(RestError::InvalidScheme {
                scheme: other.to_owned(),
                reason: "only http and https are supported".to_owned(),
            }),
            (None, _) => Err(RestError::InvalidUrl {
                url: self.url.clone(),
                kind: InvalidUrlKind::MissingScheme,
                reason: "missing scheme".to_owned(),
            }),
        }
    }

    /// Send the request.
    ///
    /// Resolves to `Ok` for every HTTP status.
    ///
    /// # Errors
    /// Fails on invalid URL or headers, transport and TLS failures, timeout,
    /// or a full request buffer ([`RestError::Overloaded`]).
    pub async fn send(mut self) -> Result<RestResponse, RestError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let uri = self.validate_url()?;

        let mut builder = Request::builder().method(self.method).uri(uri);
        let caller_set_type = self.headers.iter().any(|(name, _)| name == CONTENT_TYPE);
        if !caller_set_type && let Some(content_type) = self.payload.content_type() {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        let request = builder.body(Full::new(self.payload.into_bytes()))?;

        try_acquire_buffer_slot(&mut self.service).await?;
        let inner = self.service.call(request).await.map_err(map_buffer_error)?;

        Ok(RestResponse {
            inner,
            max_body_size: self.max_body_size,
        })
    }
}
