use std::sync::Arc;

use async_trait::async_trait;
use chawk_users_sdk::{Course, UsersError};
use serde::Deserialize;
use tracing::instrument;

use crate::domain::ports::{CourseOperations, Endpoint, EndpointResolver, Transport};

/// Course lookups through the v3 courses endpoint.
#[derive(Clone)]
pub struct HttpCourseOperations {
    transport: Arc<dyn Transport>,
    endpoints: Arc<dyn EndpointResolver>,
}

impl HttpCourseOperations {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, endpoints: Arc<dyn EndpointResolver>) -> Self {
        Self {
            transport,
            endpoints,
        }
    }
}

#[async_trait]
impl CourseOperations for HttpCourseOperations {
    #[instrument(skip_all, fields(course = %id))]
    async fn get_course(&self, id: &str) -> Result<Course, UsersError> {
        let url = self.endpoints.resolve(&Endpoint::Course { id })?;
        let resp = self.transport.get(&url).await?;
        match resp.status {
            200 => Ok(resp.json::<CourseRecord>()?.into()),
            404 => Err(UsersError::api(404, None)),
            status => Err(UsersError::api(status, Some(resp.text()))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseRecord {
    id: String,
    course_id: String,
    external_id: Option<String>,
    data_source_id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    term_id: Option<String>,
    organization: Option<bool>,
    ultra_status: Option<String>,
    availability: Option<CourseAvailability>,
}

#[derive(Debug, Deserialize)]
struct CourseAvailability {
    available: Option<String>,
}

impl From<CourseRecord> for Course {
    fn from(r: CourseRecord) -> Self {
        Self {
            id: r.id,
            course_id: r.course_id,
            external_id: r.external_id,
            data_source_id: r.data_source_id,
            name: r.name,
            description: r.description,
            term_id: r.term_id,
            organization: r.organization,
            ultra_status: r.ultra_status,
            available: r.availability.and_then(|a| a.available),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::ports::TransportResponse;
    use crate::infra::LearnEndpoints;
    use std::sync::Mutex;
    use url::Url;

    struct Canned {
        status: u16,
        body: &'static str,
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for Canned {
        async fn get(&self, url: &str) -> Result<TransportResponse, UsersError> {
            self.urls.lock().unwrap().push(url.to_owned());
            Ok(TransportResponse::new(self.status, self.body))
        }

        async fn post(
            &self,
            _url: &str,
            _body: &serde_json::Value,
        ) -> Result<TransportResponse, UsersError> {
            Err(UsersError::transport("unexpected POST"))
        }

        async fn patch(
            &self,
            _url: &str,
            _body: &serde_json::Value,
        ) -> Result<TransportResponse, UsersError> {
            Err(UsersError::transport("unexpected PATCH"))
        }
    }

    fn courses(status: u16, body: &'static str) -> (HttpCourseOperations, Arc<Canned>) {
        let transport = Arc::new(Canned {
            status,
            body,
            urls: Mutex::new(Vec::new()),
        });
        let endpoints =
            LearnEndpoints::new(Url::parse("https://learn.example.edu").unwrap()).unwrap();
        (
            HttpCourseOperations::new(transport.clone(), Arc::new(endpoints)),
            transport,
        )
    }

    #[tokio::test]
    async fn maps_course_record() {
        let (ops, transport) = courses(
            200,
            r#"{"id":"_12_1","courseId":"BIO101","name":"Biology","organization":false,
                "ultraStatus":"Classic","availability":{"available":"Term","duration":{"type":"Term"}}}"#,
        );

        let course = ops.get_course("_12_1").await.unwrap();

        assert_eq!(course.id, "_12_1");
        assert_eq!(course.course_id, "BIO101");
        assert_eq!(course.name.as_deref(), Some("Biology"));
        assert_eq!(course.available.as_deref(), Some("Term"));
        assert_eq!(course.external_id, None);
        assert_eq!(
            *transport.urls.lock().unwrap(),
            ["https://learn.example.edu/learn/api/public/v3/courses/_12_1"]
        );
    }

    #[tokio::test]
    async fn maps_failures_to_api_errors() {
        let (ops, _) = courses(404, "gone");
        assert_eq!(
            ops.get_course("_1_1").await.unwrap_err(),
            UsersError::api(404, None)
        );

        let (ops, _) = courses(500, "boom");
        assert_eq!(
            ops.get_course("_1_1").await.unwrap_err(),
            UsersError::api(500, Some("boom".to_owned()))
        );
    }
}
