//! Order list filters and the member picker search.

use std::fmt;
use std::str::FromStr;

use backoffice_core::AppError;
use backoffice_entity::member::Member;
use backoffice_entity::order::{Order, OrderStatus, PaymentStatus};

/// Order status filter: everything or one status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: OrderStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => *expected == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todos" | "" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}

/// Payment status filter: everything or one payment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentFilter {
    #[default]
    All,
    Only(PaymentStatus),
}

impl PaymentFilter {
    pub fn matches(&self, payment_status: PaymentStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => *expected == payment_status,
        }
    }
}

impl fmt::Display for PaymentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for PaymentFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todos" | "" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}

/// Combined order list filter.
///
/// The text term matches the variety or the expanded member's name,
/// case-insensitively. A blank term matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: StatusFilter,
    pub payment: PaymentFilter,
    pub text: Option<String>,
}

impl OrderFilter {
    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn payment(mut self, payment: PaymentFilter) -> Self {
        self.payment = payment;
        self
    }

    pub fn text(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.text = if term.trim().is_empty() {
            None
        } else {
            Some(term.trim().to_string())
        };
        self
    }

    /// Whether `order` passes every condition.
    pub fn matches(&self, order: &Order) -> bool {
        if !self.status.matches(order.status) || !self.payment.matches(order.payment_status) {
            return false;
        }
        match &self.text {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                order.variety.to_lowercase().contains(&term)
                    || order
                        .member_name()
                        .is_some_and(|name| name.to_lowercase().contains(&term))
            }
        }
    }

    /// The matching orders, in input order.
    pub fn apply(&self, orders: &[Order]) -> Vec<Order> {
        orders.iter().filter(|o| self.matches(o)).cloned().collect()
    }
}

/// Members whose name (case-insensitive) or phone contains `term`.
pub fn search_members<'a>(members: &'a [Member], term: &str) -> Vec<&'a Member> {
    let term = term.trim();
    members.iter().filter(|m| m.matches_search(term)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{member, order};

    #[test]
    fn test_all_returns_everything() {
        let orders = vec![
            order("Ana", "Amnesia", 10, 100, OrderStatus::Pending, PaymentStatus::Pending, 0),
            order("Beto", "Critical", 5, 50, OrderStatus::Delivered, PaymentStatus::Confirmed, 1),
        ];
        assert_eq!(OrderFilter::default().apply(&orders), orders);
        let parsed: StatusFilter = "all".parse().unwrap();
        assert_eq!(parsed, StatusFilter::All);
    }

    #[test]
    fn test_specific_status_returns_exact_subset() {
        let orders = vec![
            order("Ana", "Amnesia", 10, 100, OrderStatus::Pending, PaymentStatus::Pending, 0),
            order(
                "Beto",
                "Critical",
                5,
                50,
                OrderStatus::OutForDelivery,
                PaymentStatus::Pending,
                1,
            ),
            order("Caro", "Amnesia", 3, 30, OrderStatus::Pending, PaymentStatus::Confirmed, 2),
        ];
        let filter = OrderFilter::default().status("pendiente".parse().unwrap());
        let result = filter.apply(&orders);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|o| o.status == OrderStatus::Pending));

        let filter = filter.payment(PaymentFilter::Only(PaymentStatus::Confirmed));
        let result = filter.apply(&orders);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].member_name(), Some("Caro"));
    }

    #[test]
    fn test_text_matches_variety_or_member() {
        let orders = vec![
            order("Ana Gomez", "Amnesia", 10, 100, OrderStatus::Pending, PaymentStatus::Pending, 0),
            order("Beto", "Critical", 5, 50, OrderStatus::Pending, PaymentStatus::Pending, 1),
        ];
        assert_eq!(OrderFilter::default().text("gomez").apply(&orders).len(), 1);
        assert_eq!(OrderFilter::default().text("CRIT").apply(&orders).len(), 1);
        assert_eq!(OrderFilter::default().text("   ").apply(&orders).len(), 2);
        assert!(OrderFilter::default().text("zzz").apply(&orders).is_empty());
    }

    #[test]
    fn test_invalid_filter_value_is_rejected() {
        let err = "archivado".parse::<StatusFilter>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_search_members_by_name_or_phone() {
        let members = vec![
            member("Juan Perez", Some("099123456")),
            member("Maria Lopez", None),
        ];
        assert_eq!(search_members(&members, "juan").len(), 1);
        assert_eq!(search_members(&members, "1234").len(), 1);
        assert_eq!(search_members(&members, "").len(), 2);
    }
}
