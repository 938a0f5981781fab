//! Mock implementations for testing.

mod transport;

pub use transport::{MockResponse, MockTransport, RecordedRequest};
