use tower::ServiceExt;

use crate::layer::BearerAuthLayer;
use crate::token::Token;

/// Bearer auth for [`chawk_http::RestClientBuilder`].
pub trait RestClientBuilderExt {
    /// Attach `Authorization: Bearer <token>` to every request of the client.
    #[must_use]
    fn with_bearer_auth(self, token: Token) -> Self;
}

impl RestClientBuilderExt for chawk_http::RestClientBuilder {
    fn with_bearer_auth(self, token: Token) -> Self {
        let layer = BearerAuthLayer::new(token);
        self.with_auth_layer(move |svc| {
            tower::ServiceBuilder::new()
                .layer(layer)
                .service(svc)
                .boxed_clone()
        })
    }
}
