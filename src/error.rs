// Error types for sample text loading

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TextLoadError {
    #[snafu(display("Unable to build HTTP client for sample text"))]
    Client { source: reqwest::Error },
    #[snafu(display("Error requesting sample text from {url}"))]
    Request { url: String, source: reqwest::Error },
    #[snafu(display("Sample text endpoint {url} answered with status {status}"))]
    Status { url: String, status: u16 },
    #[snafu(display("Error decoding sample text payload"))]
    Decode { source: serde_json::Error },
    #[snafu(display("Sample text payload contained no quotes"))]
    NoQuotes,
    #[snafu(display("No sample text source available: {reason}"))]
    Unavailable { reason: String },
}
