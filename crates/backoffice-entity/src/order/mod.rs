//! Order (pedido) domain entities.

pub mod draft;
pub mod model;
pub mod status;

pub use draft::OrderDraft;
pub use model::{CreateOrder, Order, OrderPatch};
pub use status::{FulfillmentMode, OrderStatus, PaymentMethod, PaymentStatus};
