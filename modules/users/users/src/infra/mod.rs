pub mod courses;
pub mod endpoints;
pub mod transport;

pub use courses::HttpCourseOperations;
pub use endpoints::LearnEndpoints;
pub use transport::HttpTransport;
