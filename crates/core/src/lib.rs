pub mod domain;
pub mod split;
pub mod settlement;
pub mod math;

pub use domain::{ItemId, LineItems, OrderItem, PaymentMethod};
pub use split::{DropTarget, SessionConfig, SessionObserver, Split, SplitId, SplitSession, MIN_SPLITS};
pub use settlement::{PaymentProcessor, SessionSummary, SplitSummary};

/// Core result type for split-check operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
