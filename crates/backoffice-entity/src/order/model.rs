//! Order entity model and its insert/patch payloads.

use backoffice_core::traits::Record;
use backoffice_core::types::{MemberId, OrderId};
use backoffice_core::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::status::{FulfillmentMode, OrderStatus, PaymentMethod, PaymentStatus};
use crate::member::Member;
use crate::wire::{lenient_date, non_blank};

/// An order placed by a member (`pedidos` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// The member who placed the order.
    #[serde(rename = "socio_id")]
    pub member_id: MemberId,
    /// Order date as recorded by the backend.
    #[serde(
        rename = "fecha_pedido",
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_date: Option<NaiveDate>,
    /// Product variety, free text.
    #[serde(rename = "variedad")]
    pub variety: String,
    /// Quantity in grams.
    #[serde(rename = "cantidad")]
    pub quantity: Decimal,
    /// Total price.
    #[serde(rename = "precio_total")]
    pub total: Decimal,
    /// Pickup or delivery.
    #[serde(rename = "modalidad")]
    pub mode: FulfillmentMode,
    /// Delivery address; only set for deliveries.
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    /// Payment method.
    #[serde(rename = "metodo_pago")]
    pub payment_method: PaymentMethod,
    /// Payment status.
    #[serde(rename = "estado_pago")]
    pub payment_status: PaymentStatus,
    /// Order status.
    #[serde(rename = "estado_pedido")]
    pub status: OrderStatus,
    /// Scheduled delivery date.
    #[serde(
        rename = "fecha_entrega",
        default,
        deserialize_with = "lenient_date"
    )]
    pub delivery_date: Option<NaiveDate>,
    /// Delivery time window, e.g. `18-20`.
    #[serde(rename = "horario_entrega", default)]
    pub delivery_window: Option<String>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// The member row, when the query expanded it.
    #[serde(rename = "socio", default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
}

impl Order {
    /// Name of the expanded member, if present.
    pub fn member_name(&self) -> Option<&str> {
        self.member.as_ref().map(|m| m.name.as_str())
    }

    /// Whether the order is delivered and paid.
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Delivered && self.payment_status == PaymentStatus::Confirmed
    }
}

impl Record for Order {
    type Id = OrderId;
    type Patch = OrderPatch;

    const TABLE: &'static str = "pedidos";

    fn id(&self) -> OrderId {
        self.id
    }

    fn apply_patch(&mut self, patch: &OrderPatch) {
        if let Some(member_id) = patch.member_id {
            if member_id != self.member_id {
                self.member = None;
            }
            self.member_id = member_id;
        }
        if let Some(variety) = &patch.variety {
            self.variety = variety.clone();
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(total) = patch.total {
            self.total = total;
        }
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(address) = &patch.address {
            self.address = address.clone();
        }
        if let Some(method) = patch.payment_method {
            self.payment_method = method;
        }
        if let Some(payment_status) = patch.payment_status {
            self.payment_status = payment_status;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(date) = patch.delivery_date {
            self.delivery_date = date;
        }
        if let Some(window) = &patch.delivery_window {
            self.delivery_window = window.clone();
        }
    }
}

/// Data required to create an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateOrder {
    /// The member placing the order.
    #[serde(rename = "socio_id")]
    pub member_id: MemberId,
    /// Order date; the backend fills it in when absent.
    #[serde(rename = "fecha_pedido", skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,
    /// Product variety.
    #[serde(rename = "variedad")]
    #[validate(length(min = 1, message = "variety is required"))]
    pub variety: String,
    /// Quantity in grams, strictly positive.
    #[serde(rename = "cantidad")]
    pub quantity: Decimal,
    /// Total price, non-negative.
    #[serde(rename = "precio_total")]
    pub total: Decimal,
    /// Pickup or delivery.
    #[serde(rename = "modalidad")]
    pub mode: FulfillmentMode,
    /// Delivery address.
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    /// Payment method.
    #[serde(rename = "metodo_pago")]
    pub payment_method: PaymentMethod,
    /// Payment status.
    #[serde(rename = "estado_pago")]
    pub payment_status: PaymentStatus,
    /// Order status.
    #[serde(rename = "estado_pedido")]
    pub status: OrderStatus,
    /// Scheduled delivery date.
    #[serde(rename = "fecha_entrega")]
    pub delivery_date: Option<NaiveDate>,
    /// Delivery time window.
    #[serde(rename = "horario_entrega")]
    pub delivery_window: Option<String>,
}

impl CreateOrder {
    /// Normalize free-text fields and run every client-side check.
    ///
    /// Pickup orders never carry an address; deliveries must.
    pub fn prepare(self) -> AppResult<Self> {
        let mut prepared = Self {
            variety: self.variety.trim().to_string(),
            address: non_blank(self.address),
            delivery_window: non_blank(self.delivery_window),
            ..self
        };
        if !prepared.mode.needs_address() {
            prepared.address = None;
        }

        prepared.validate()?;
        if prepared.quantity <= Decimal::ZERO {
            return Err(AppError::validation("quantity: must be greater than zero"));
        }
        if prepared.total < Decimal::ZERO {
            return Err(AppError::validation("total: must not be negative"));
        }
        if prepared.mode.needs_address() && prepared.address.is_none() {
            return Err(AppError::validation(
                "address: required for delivery orders",
            ));
        }
        Ok(prepared)
    }
}

/// Partial update of an order. Only set fields are sent; the doubly
/// optional fields send `null` when set to `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderPatch {
    /// New member.
    #[serde(rename = "socio_id", skip_serializing_if = "Option::is_none")]
    pub member_id: Option<MemberId>,
    /// New variety.
    #[serde(rename = "variedad", skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    /// New quantity.
    #[serde(rename = "cantidad", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    /// New total.
    #[serde(rename = "precio_total", skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    /// New fulfillment mode.
    #[serde(rename = "modalidad", skip_serializing_if = "Option::is_none")]
    pub mode: Option<FulfillmentMode>,
    /// New address.
    #[serde(rename = "direccion", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
    /// New payment method.
    #[serde(rename = "metodo_pago", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// New payment status.
    #[serde(rename = "estado_pago", skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    /// New order status.
    #[serde(rename = "estado_pedido", skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    /// New delivery date.
    #[serde(rename = "fecha_entrega", default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<Option<NaiveDate>>,
    /// New delivery window.
    #[serde(
        rename = "horario_entrega",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub delivery_window: Option<Option<String>>,
}

impl OrderPatch {
    /// A patch that only changes the order status.
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// A patch that only changes the payment status.
    pub fn payment_status(payment_status: PaymentStatus) -> Self {
        Self {
            payment_status: Some(payment_status),
            ..Default::default()
        }
    }

    /// A patch that only changes both status fields.
    pub fn statuses(status: OrderStatus, payment_status: PaymentStatus) -> Self {
        Self {
            status: Some(status),
            payment_status: Some(payment_status),
            ..Default::default()
        }
    }

    /// Whether the patch sets any field at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<CreateOrder> for OrderPatch {
    /// A full edit: every form field is written, including cleared ones.
    fn from(order: CreateOrder) -> Self {
        Self {
            member_id: Some(order.member_id),
            variety: Some(order.variety),
            quantity: Some(order.quantity),
            total: Some(order.total),
            mode: Some(order.mode),
            address: Some(order.address),
            payment_method: Some(order.payment_method),
            payment_status: Some(order.payment_status),
            status: Some(order.status),
            delivery_date: Some(order.delivery_date),
            delivery_window: Some(order.delivery_window),
        }
    }
}
