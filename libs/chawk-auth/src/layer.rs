use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use chawk_http::RestError;
use http::header::AUTHORIZATION;
use http::{HeaderValue, Request, Response, StatusCode};
use tower::{Layer, Service};

use crate::token::Token;

/// Adds `Authorization: Bearer <token>` to each request and invalidates the
/// token when the response is `401 Unauthorized`.
#[derive(Clone, Debug)]
pub struct BearerAuthLayer {
    token: Token,
}

impl BearerAuthLayer {
    #[must_use]
    pub fn new(token: Token) -> Self {
        Self { token }
    }
}

impl<S> Layer<S> for BearerAuthLayer {
    type Service = BearerAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerAuthService {
            inner,
            token: self.token.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BearerAuthService<S> {
    inner: S,
    token: Token,
}

impl<S, B, ResBody> Service<Request<B>> for BearerAuthService<S>
where
    S: Service<Request<B>, Response = Response<ResBody>, Error = RestError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
    B: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = RestError;
    type Future = Pin<Box<dyn Future<Output = Result<Response<ResBody>, RestError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        // Clone-swap: the readied service goes into the future.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let token = self.token.clone();

        Box::pin(async move {
            let secret = token
                .get()
                .await
                .map_err(|e| RestError::Transport(Box::new(e)))?;
            let raw = zeroize::Zeroizing::new(format!("Bearer {}", secret.expose()));
            let mut value = HeaderValue::from_str(&raw)?;
            value.set_sensitive(true);
            req.headers_mut().insert(AUTHORIZATION, value);

            let response = inner.call(req).await?;
            if response.status() == StatusCode::UNAUTHORIZED {
                token.invalidate().await;
            }
            Ok(response)
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::OAuthClientConfig;
    use bytes::Bytes;
    use http_body_util::Full;
    use httpmock::prelude::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU16, Ordering};
    use tower::ServiceExt;
    use url::Url;

    /// Replies with a fixed status and echoes the auth header back.
    #[derive(Clone)]
    struct StatusService {
        status: Arc<AtomicU16>,
    }

    impl Service<Request<Full<Bytes>>> for StatusService {
        type Response = Response<Full<Bytes>>;
        type Error = RestError;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
            let status = StatusCode::from_u16(self.status.load(Ordering::SeqCst)).unwrap();
            let auth = req.headers().get(AUTHORIZATION).cloned();
            Box::pin(async move {
                let mut resp = Response::new(Full::new(Bytes::new()));
                *resp.status_mut() = status;
                if let Some(auth) = auth {
                    resp.headers_mut().insert(AUTHORIZATION, auth);
                }
                Ok(resp)
            })
        }
    }

    async fn token_for(server: &MockServer) -> Token {
        let mut config = OAuthClientConfig::new(
            Url::parse(&server.url("/token")).unwrap(),
            "app-key",
            "app-secret",
        );
        config.http_config = Some(chawk_http::RestClientConfig::for_testing());
        Token::new(config).await.unwrap()
    }

    fn request() -> Request<Full<Bytes>> {
        Request::builder()
            .uri("https://learn.example.edu/learn/api/public/v1/users")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn header_is_injected_and_sensitive() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/token");
            then.status(200)
                .body(r#"{"access_token":"tok-layer","token_type":"bearer","expires_in":3600}"#);
        });

        let svc = BearerAuthLayer::new(token_for(&server).await).layer(StatusService {
            status: Arc::new(AtomicU16::new(200)),
        });
        let resp = svc.oneshot(request()).await.unwrap();

        let auth = resp.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(auth, "Bearer tok-layer");
    }

    #[tokio::test]
    async fn unauthorized_response_invalidates_token() {
        let server = MockServer::start();
        let token_mock = server.mock(|when, then| {
            when.method(POST).path("/token");
            then.status(200)
                .body(r#"{"access_token":"tok","token_type":"bearer","expires_in":3600}"#);
        });

        let status = Arc::new(AtomicU16::new(401));
        let mut svc = BearerAuthLayer::new(token_for(&server).await).layer(StatusService {
            status: Arc::clone(&status),
        });

        let resp = svc.ready().await.unwrap().call(request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        status.store(200, Ordering::SeqCst);
        svc.ready().await.unwrap().call(request()).await.unwrap();

        token_mock.assert_calls(2);
    }

    #[tokio::test]
    async fn token_failure_becomes_transport_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/token");
            then.status(500);
        });

        let svc = BearerAuthLayer::new(token_for(&server).await).layer(StatusService {
            status: Arc::new(AtomicU16::new(200)),
        });
        let err = svc.oneshot(request()).await.unwrap_err();
        assert!(matches!(err, RestError::Transport(_)));
        assert!(err.to_string().contains("OAuth2 token HTTP 500"));
    }
}
