pub mod items;
pub mod payment;

pub use items::{ItemId, LineItems, OrderItem};
pub use payment::PaymentMethod;
