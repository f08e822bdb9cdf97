use crate::config::ERROR_BODY_PREVIEW_LIMIT;
use crate::error::RestError;
use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

/// Type-erased response body (possibly decompressed).
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// Response returned by [`RestRequest::send`](crate::RestRequest::send).
///
/// Every body reader enforces the client's `max_body_size`.
#[derive(Debug)]
pub struct RestResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
}

impl RestResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Turn a non-2xx status into [`RestError::Status`] without reading the body.
    ///
    /// # Errors
    /// Returns [`RestError::Status`] for non-2xx responses.
    pub fn error_for_status(self) -> Result<Self, RestError> {
        if self.inner.status().is_success() {
            Ok(self)
        } else {
            Err(RestError::Status {
                status: self.inner.status(),
                body_preview: String::new(),
            })
        }
    }

    /// Read the whole body regardless of status.
    ///
    /// # Errors
    /// Returns [`RestError::BodyTooLarge`] or a transport error while reading.
    pub async fn bytes(self) -> Result<Bytes, RestError> {
        read_limited(self.inner, self.max_body_size).await
    }

    /// Read the body of a 2xx response.
    ///
    /// # Errors
    /// Returns [`RestError::Status`] (with a body excerpt) for non-2xx responses.
    pub async fn checked_bytes(self) -> Result<Bytes, RestError> {
        let status = self.inner.status();
        if status.is_success() {
            return read_limited(self.inner, self.max_body_size).await;
        }

        let preview_limit = self.max_body_size.min(ERROR_BODY_PREVIEW_LIMIT);
        let body_preview = match read_limited(self.inner, preview_limit).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(RestError::BodyTooLarge { .. }) => "<body too large for preview>".to_owned(),
            Err(e) => return Err(e),
        };
        Err(RestError::Status {
            status,
            body_preview,
        })
    }

    /// Decode the body of a 2xx response as JSON.
    ///
    /// # Errors
    /// Same as [`checked_bytes`](Self::checked_bytes), plus [`RestError::Json`].
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, RestError> {
        let bytes = self.checked_bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Body of a 2xx response as lossy UTF-8.
    ///
    /// # Errors
    /// Same as [`checked_bytes`](Self::checked_bytes).
    pub async fn text(self) -> Result<String, RestError> {
        let bytes = self.checked_bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

async fn read_limited(response: Response<ResponseBody>, limit: usize) -> Result<Bytes, RestError> {
    let mut body = std::pin::pin!(response.into_body());
    let mut collected = Vec::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(RestError::Transport)?;
        if let Some(chunk) = frame.data_ref() {
            let actual = collected.len() + chunk.len();
            if actual > limit {
                return Err(RestError::BodyTooLarge { limit, actual });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http_body_util::Full;

    fn response(status: u16, body: &'static str, limit: usize) -> RestResponse {
        let body: ResponseBody = Full::new(Bytes::from_static(body.as_bytes()))
            .map_err(|never| match never {})
            .boxed();
        let mut inner = Response::new(body);
        *inner.status_mut() = StatusCode::from_u16(status).unwrap();
        RestResponse {
            inner,
            max_body_size: limit,
        }
    }

    #[tokio::test]
    async fn test_bytes_ignores_status() {
        let bytes = response(409, "duplicate", 1024).bytes().await.unwrap();
        assert_eq!(&bytes[..], b"duplicate");
    }

    #[tokio::test]
    async fn test_checked_bytes_reports_status_with_preview() {
        let err = response(400, "A database error occurred", 1024)
            .checked_bytes()
            .await
            .unwrap_err();
        match err {
            RestError::Status {
                status,
                body_preview,
            } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body_preview, "A database error occurred");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_body_limit_enforced() {
        let err = response(200, "0123456789", 4).bytes().await.unwrap_err();
        assert!(matches!(
            err,
            RestError::BodyTooLarge {
                limit: 4,
                actual: 10
            }
        ));
    }

    #[tokio::test]
    async fn test_json_decodes_success_body() {
        let value: serde_json::Value = response(200, r#"{"courseRoleId":"Student"}"#, 1024)
            .json()
            .await
            .unwrap();
        assert_eq!(value["courseRoleId"], "Student");
    }

    #[test]
    fn test_error_for_status() {
        assert!(response(200, "", 16).error_for_status().is_ok());
        let err = response(503, "", 16).error_for_status().unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }
}
