//! Entity builders shared by unit tests.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use backoffice_core::types::{MemberId, OrderId};
use backoffice_entity::member::Member;
use backoffice_entity::order::{
    FulfillmentMode, Order, OrderStatus, PaymentMethod, PaymentStatus,
};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// Noon UTC, `days_ago` days before [`today`].
pub fn at(days_ago: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap() - Duration::days(days_ago)
}

pub fn member(name: &str, phone: Option<&str>) -> Member {
    Member {
        id: MemberId::new(),
        name: name.to_string(),
        phone: phone.map(str::to_string),
        created_at: at(100),
    }
}

pub fn order_for(
    member: &Member,
    variety: &str,
    quantity: i64,
    total: i64,
    days_ago: i64,
) -> Order {
    Order {
        id: OrderId::new(),
        member_id: member.id,
        order_date: Some(at(days_ago).date_naive()),
        variety: variety.to_string(),
        quantity: Decimal::from(quantity),
        total: Decimal::from(total),
        mode: FulfillmentMode::Pickup,
        address: None,
        payment_method: PaymentMethod::Cash,
        payment_status: PaymentStatus::Pending,
        status: OrderStatus::Pending,
        delivery_date: None,
        delivery_window: None,
        created_at: at(days_ago),
        member: Some(member.clone()),
    }
}

pub fn order(
    member_name: &str,
    variety: &str,
    quantity: i64,
    total: i64,
    status: OrderStatus,
    payment_status: PaymentStatus,
    days_ago: i64,
) -> Order {
    let mut order = order_for(&member(member_name, None), variety, quantity, total, days_ago);
    order.status = status;
    order.payment_status = payment_status;
    order
}

/// A backend over a fresh in-process store.
pub fn memory_backend() -> (
    backoffice_backend::Backend,
    std::sync::Arc<backoffice_backend::MemoryRecordStore>,
) {
    let store = std::sync::Arc::new(backoffice_backend::MemoryRecordStore::default());
    let auth = std::sync::Arc::new(backoffice_backend::auth::MemoryAuthGateway::new());
    (
        backoffice_backend::Backend::from_memory(store.clone(), auth),
        store,
    )
}
