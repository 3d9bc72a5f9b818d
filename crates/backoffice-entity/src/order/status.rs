//! Order enumerations: fulfillment mode, payment method, payment status and
//! order status. Serialized with the backend's Spanish labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use backoffice_core::AppError;

/// How an order reaches the member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FulfillmentMode {
    /// The member picks the order up.
    #[default]
    #[serde(rename = "retiro")]
    Pickup,
    /// The order is delivered to an address.
    #[serde(rename = "envio")]
    Delivery,
}

impl FulfillmentMode {
    /// Return the backend label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "retiro",
            Self::Delivery => "envio",
        }
    }

    /// Whether an address is required.
    pub fn needs_address(&self) -> bool {
        matches!(self, Self::Delivery)
    }
}

impl fmt::Display for FulfillmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FulfillmentMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "retiro" | "pickup" => Ok(Self::Pickup),
            "envio" | "delivery" => Ok(Self::Delivery),
            _ => Err(AppError::validation(format!(
                "Invalid fulfillment mode: '{s}'. Expected one of: retiro, envio"
            ))),
        }
    }
}

/// How the member pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash on pickup or delivery.
    #[default]
    #[serde(rename = "efectivo")]
    Cash,
    /// Bank transfer.
    #[serde(rename = "transferencia")]
    Transfer,
}

impl PaymentMethod {
    /// Return the backend label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "efectivo",
            Self::Transfer => "transferencia",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "efectivo" | "cash" => Ok(Self::Cash),
            "transferencia" | "transfer" => Ok(Self::Transfer),
            _ => Err(AppError::validation(format!(
                "Invalid payment method: '{s}'. Expected one of: efectivo, transferencia"
            ))),
        }
    }
}

/// Whether the payment was received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Not paid yet.
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    /// Payment confirmed.
    #[serde(rename = "confirmado")]
    Confirmed,
}

impl PaymentStatus {
    /// Return the backend label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Confirmed => "confirmado",
        }
    }

    /// The other payment status.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Pending => Self::Confirmed,
            Self::Confirmed => Self::Pending,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pendiente" | "pending" => Ok(Self::Pending),
            "confirmado" | "confirmed" => Ok(Self::Confirmed),
            _ => Err(AppError::validation(format!(
                "Invalid payment status: '{s}'. Expected one of: pendiente, confirmado"
            ))),
        }
    }
}

/// Lifecycle of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted, not dispatched.
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    /// Out for delivery.
    #[serde(rename = "en_reparto")]
    OutForDelivery,
    /// Handed to the member.
    #[serde(rename = "entregado")]
    Delivered,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 3] = [Self::Pending, Self::OutForDelivery, Self::Delivered];

    /// Return the backend label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::OutForDelivery => "en_reparto",
            Self::Delivered => "entregado",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pendiente" | "pending" => Ok(Self::Pending),
            "en_reparto" | "en reparto" | "out_for_delivery" => Ok(Self::OutForDelivery),
            "entregado" | "delivered" => Ok(Self::Delivered),
            _ => Err(AppError::validation(format!(
                "Invalid order status: '{s}'. Expected one of: pendiente, en_reparto, entregado"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_labels() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OutForDelivery).unwrap(),
            "\"en_reparto\""
        );
        assert_eq!(
            serde_json::from_str::<FulfillmentMode>("\"envio\"").unwrap(),
            FulfillmentMode::Delivery
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Transfer).unwrap(),
            "\"transferencia\""
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("EN_REPARTO".parse::<OrderStatus>().unwrap(), OrderStatus::OutForDelivery);
        assert_eq!("confirmado".parse::<PaymentStatus>().unwrap(), PaymentStatus::Confirmed);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_payment_toggle() {
        assert_eq!(PaymentStatus::Pending.toggled(), PaymentStatus::Confirmed);
        assert_eq!(PaymentStatus::Confirmed.toggled(), PaymentStatus::Pending);
    }
}
