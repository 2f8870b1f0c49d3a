use crate::TimeUnit;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The element is not held by the set, either because it was never
    /// inserted, was removed, or expired and was evicted.
    #[error("element not found")]
    NotFound,

    /// The TTL cannot be represented as a deadline.
    #[error("ttl of {ttl} {unit} is out of range")]
    InvalidArgument { ttl: i64, unit: TimeUnit },
}
