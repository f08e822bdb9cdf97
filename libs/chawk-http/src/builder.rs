use crate::client::{BufferedService, RestClient};
use crate::config::{RestClientConfig, TlsRootConfig, TransportSecurity};
use crate::error::RestError;
use crate::layers::UserAgentLayer;
use crate::response::ResponseBody;
use crate::tls;
use bytes::Bytes;
use http::Response;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use std::time::Duration;
use tower::buffer::Buffer;
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneService;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::decompression::DecompressionLayer;

/// Type-erased service handed to the auth layer hook of [`RestClientBuilder`].
pub type InnerService =
    BoxCloneService<http::Request<Full<Bytes>>, http::Response<ResponseBody>, RestError>;

type AuthWrap = Box<dyn FnOnce(InnerService) -> InnerService + Send>;

/// Builds a [`RestClient`].
pub struct RestClientBuilder {
    config: RestClientConfig,
    auth_layer: Option<AuthWrap>,
}

impl RestClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RestClientConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RestClientConfig) -> Self {
        Self {
            config,
            auth_layer: None,
        }
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Limit applied to decompressed response bodies.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: TransportSecurity) -> Self {
        self.config.transport = transport;
        self
    }

    #[must_use]
    pub fn tls_roots(mut self, roots: TlsRootConfig) -> Self {
        self.config.tls_roots = roots;
        self
    }

    /// Accept plain `http://` URLs. Only compiled into debug builds unless the
    /// `allow-insecure-http` feature is on.
    #[must_use]
    #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
    pub fn allow_insecure_http(mut self) -> Self {
        self.config.transport = TransportSecurity::AllowInsecureHttp;
        self
    }

    /// Queue depth in front of the stack. Zero is clamped to one.
    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity.max(1);
        self
    }

    /// Wrap the inner stack with an auth layer.
    ///
    /// The wrapper sits between the buffer and the timeout, so it runs once per
    /// request and sees every response status. A second call replaces the first.
    #[must_use]
    pub fn with_auth_layer(
        mut self,
        wrap: impl FnOnce(InnerService) -> InnerService + Send + 'static,
    ) -> Self {
        self.auth_layer = Some(Box::new(wrap));
        self
    }

    /// Assemble the stack:
    /// `Buffer → [auth] → error mapping → Timeout → UserAgent → Decompression → hyper`.
    ///
    /// Must be called inside a tokio runtime (the buffer spawns its worker).
    ///
    /// # Errors
    /// Returns [`RestError::Tls`] when the TLS roots cannot be loaded and
    /// [`RestError::InvalidHeaderValue`] for an unusable user agent.
    pub fn build(self) -> Result<RestClient, RestError> {
        if self.config.transport == TransportSecurity::AllowInsecureHttp {
            tracing::warn!("plain HTTP allowed; use only against local mock servers");
        }

        let timeout = self.config.request_timeout;
        let https = build_https_connector(self.config.tls_roots, self.config.transport)?;

        let mut pool = Client::builder(TokioExecutor::new());
        // pool_timer is required for pool_idle_timeout to take effect
        pool.pool_timer(TokioTimer::new())
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host)
            .http2_only(false);
        if let Some(idle) = self.config.pool_idle_timeout {
            pool.pool_idle_timeout(idle);
        }
        let hyper_client = pool.build::<_, Full<Bytes>>(https);

        let ua_layer = UserAgentLayer::try_new(&self.config.user_agent)?;

        let service = ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .layer(ua_layer)
            .layer(DecompressionLayer::new())
            .service(hyper_client)
            .map_response(box_response_body)
            .map_err(move |e: tower::BoxError| map_stack_error(e, timeout));

        let mut inner: InnerService = service.boxed_clone();
        if let Some(wrap) = self.auth_layer {
            inner = wrap(inner);
        }

        let service: BufferedService = Buffer::new(inner, self.config.buffer_capacity.max(1));

        Ok(RestClient {
            service,
            max_body_size: self.config.max_body_size,
            transport_security: self.config.transport,
        })
    }
}

impl Default for RestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn map_stack_error(err: tower::BoxError, timeout: Duration) -> RestError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return RestError::Timeout(timeout);
    }
    match err.downcast::<RestError>() {
        Ok(rest) => *rest,
        Err(other) => RestError::Transport(other),
    }
}

fn box_response_body<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: hyper::body::Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, body.map_err(Into::into).boxed())
}

fn build_https_connector(
    roots: TlsRootConfig,
    transport: TransportSecurity,
) -> Result<HttpsConnector<HttpConnector>, RestError> {
    let allow_http = transport == TransportSecurity::AllowInsecureHttp;

    let builder = match roots {
        TlsRootConfig::WebPki => hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(tls::crypto_provider())
            .map_err(|e| RestError::Tls(Box::new(e)))?,
        TlsRootConfig::Native => {
            let config = tls::native_roots_client_config().map_err(|e| RestError::Tls(e.into()))?;
            hyper_rustls::HttpsConnectorBuilder::new().with_tls_config(config)
        }
    };

    let connector = if allow_http {
        builder.https_or_http().enable_all_versions().build()
    } else {
        builder.https_only().enable_all_versions().build()
    };
    Ok(connector)
}
