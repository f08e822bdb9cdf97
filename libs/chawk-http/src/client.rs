use crate::builder::RestClientBuilder;
use crate::config::TransportSecurity;
use crate::error::RestError;
use crate::request::RestRequest;
use crate::response::ResponseBody;
use bytes::Bytes;
use http::{Method, Request, Response};
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;
use std::task::Poll;
use tower::Service;
use tower::buffer::Buffer;

pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, RestError>> + Send>>;

pub type BufferedService = Buffer<Request<Full<Bytes>>, ServiceFuture>;

/// HTTP client shared by every chawk component.
///
/// Cloning is cheap: clones share the same buffer worker and connection pool.
/// Use [`RestClientBuilder`] for anything beyond the defaults.
#[derive(Clone)]
pub struct RestClient {
    pub(crate) service: BufferedService,
    pub(crate) max_body_size: usize,
    pub(crate) transport_security: TransportSecurity,
}

impl RestClient {
    /// # Errors
    /// Returns an error if TLS initialization fails.
    pub fn new() -> Result<Self, RestError> {
        RestClientBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::new()
    }

    /// Start a `GET`. The URL must be absolute.
    pub fn get(&self, url: &str) -> RestRequest {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RestRequest {
        self.request(Method::POST, url)
    }

    pub fn patch(&self, url: &str) -> RestRequest {
        self.request(Method::PATCH, url)
    }

    fn request(&self, method: Method, url: &str) -> RestRequest {
        RestRequest::new(
            self.service.clone(),
            self.max_body_size,
            method,
            url.to_owned(),
            self.transport_security,
        )
    }
}

/// Unwrap the inner [`RestError`] from a buffer error. Anything else means
/// the worker is gone.
pub fn map_buffer_error(err: tower::BoxError) -> RestError {
    match err.downcast::<RestError>() {
        Ok(rest) => *rest,
        Err(err) => {
            tracing::error!(error = %err, "request worker stopped unexpectedly");
            RestError::ServiceClosed
        }
    }
}

/// Poll the buffer once; a full buffer fails with `Overloaded` instead of
/// queueing the caller.
pub async fn try_acquire_buffer_slot(service: &mut BufferedService) -> Result<(), RestError> {
    let ready = std::future::poll_fn(|cx| match service.poll_ready(cx) {
        Poll::Ready(result) => Poll::Ready(Some(result)),
        Poll::Pending => Poll::Ready(None),
    })
    .await;

    match ready {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(map_buffer_error(e)),
        None => Err(RestError::Overloaded),
    }
}
