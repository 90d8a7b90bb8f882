
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The execution service could not be reached (refused, DNS, timeout).
    #[error("error communicating with the execution service: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("execution service returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The service answered 2xx but the body is not a JSON object.
    #[error("execution service sent an unreadable body: {0}")]
    Decode(#[source] reqwest::Error),
}
