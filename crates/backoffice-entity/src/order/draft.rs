//! Order form state.
//!
//! A draft holds what the user typed so far, including a possibly missing
//! member, and turns into a validated [`CreateOrder`] with [`OrderDraft::build`].

use backoffice_core::types::MemberId;
use backoffice_core::{AppError, AppResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::model::{CreateOrder, Order};
use super::status::{FulfillmentMode, OrderStatus, PaymentMethod, PaymentStatus};

/// Delivery window preselected on new orders.
pub const DEFAULT_DELIVERY_WINDOW: &str = "18-20";

/// Editable order form.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub member_id: Option<MemberId>,
    pub variety: String,
    pub quantity: Option<Decimal>,
    pub total: Option<Decimal>,
    pub mode: FulfillmentMode,
    pub address: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_window: Option<String>,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self {
            member_id: None,
            variety: String::new(),
            quantity: None,
            total: None,
            mode: FulfillmentMode::Pickup,
            address: None,
            payment_method: PaymentMethod::Cash,
            payment_status: PaymentStatus::Pending,
            status: OrderStatus::Pending,
            delivery_date: None,
            delivery_window: Some(DEFAULT_DELIVERY_WINDOW.to_string()),
        }
    }
}

impl OrderDraft {
    /// Defaults of the quick-order panel: one unit, delivered today.
    pub fn quick(today: NaiveDate) -> Self {
        Self {
            quantity: Some(Decimal::ONE),
            delivery_date: Some(today),
            ..Self::default()
        }
    }

    /// Prefill the form from an existing order for editing.
    pub fn from_order(order: &Order) -> Self {
        Self {
            member_id: Some(order.member_id),
            variety: order.variety.clone(),
            quantity: Some(order.quantity),
            total: Some(order.total),
            mode: order.mode,
            address: order.address.clone(),
            payment_method: order.payment_method,
            payment_status: order.payment_status,
            status: order.status,
            delivery_date: order.delivery_date,
            delivery_window: order.delivery_window.clone(),
        }
    }

    pub fn member(mut self, member_id: MemberId) -> Self {
        self.member_id = Some(member_id);
        self
    }

    pub fn variety(mut self, variety: impl Into<String>) -> Self {
        self.variety = variety.into();
        self
    }

    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn total(mut self, total: Decimal) -> Self {
        self.total = Some(total);
        self
    }

    pub fn mode(mut self, mode: FulfillmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    pub fn payment_status(mut self, payment_status: PaymentStatus) -> Self {
        self.payment_status = payment_status;
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn delivery_date(mut self, date: Option<NaiveDate>) -> Self {
        self.delivery_date = date;
        self
    }

    pub fn delivery_window(mut self, window: Option<String>) -> Self {
        self.delivery_window = window;
        self
    }

    /// Validate the form and produce the insert payload.
    pub fn build(self) -> AppResult<CreateOrder> {
        let member_id = self
            .member_id
            .ok_or_else(|| AppError::validation("member: select a member"))?;
        let quantity = self
            .quantity
            .ok_or_else(|| AppError::validation("quantity: required"))?;
        let total = self
            .total
            .ok_or_else(|| AppError::validation("total: required"))?;

        CreateOrder {
            member_id,
            order_date: None,
            variety: self.variety,
            quantity,
            total,
            mode: self.mode,
            address: self.address,
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            status: self.status,
            delivery_date: self.delivery_date,
            delivery_window: self.delivery_window,
        }
        .prepare()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_defaults() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let draft = OrderDraft::quick(today);
        assert_eq!(draft.mode, FulfillmentMode::Pickup);
        assert_eq!(draft.payment_method, PaymentMethod::Cash);
        assert_eq!(draft.payment_status, PaymentStatus::Pending);
        assert_eq!(draft.status, OrderStatus::Pending);
        assert_eq!(draft.quantity, Some(Decimal::ONE));
        assert_eq!(draft.delivery_date, Some(today));
        assert_eq!(draft.delivery_window.as_deref(), Some("18-20"));
    }

    #[test]
    fn test_missing_member_rejected() {
        let err = OrderDraft::default()
            .variety("Amnesia")
            .quantity(Decimal::from(5))
            .total(Decimal::from(25000))
            .build()
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.message.contains("member"));
    }

    #[test]
    fn test_build_pickup_order() {
        let order = OrderDraft::default()
            .member(MemberId::new())
            .variety("Amnesia")
            .quantity(Decimal::from(5))
            .total(Decimal::from(25000))
            .address("ignored for pickup")
            .build()
            .unwrap();
        assert!(order.address.is_none());
        assert_eq!(order.total, Decimal::from(25000));
    }
}
