//! Aggregates over a loaded order collection.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use backoffice_entity::order::{Order, OrderStatus, PaymentStatus};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Revenue totals across a set of orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub revenue: Decimal,
    pub order_count: usize,
    pub distinct_members: usize,
    /// Revenue per order; zero when there are no orders.
    pub average_ticket: Decimal,
}

/// Revenue and order count of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub total: Decimal,
    pub count: usize,
}

/// Quantity ordered of one variety.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarietyShare {
    pub variety: String,
    pub quantity: Decimal,
}

/// Orders per lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub out_for_delivery: usize,
    pub delivered: usize,
}

impl StatusCounts {
    pub fn count(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::OutForDelivery => self.out_for_delivery,
            OrderStatus::Delivered => self.delivered,
        }
    }
}

/// Counters behind the dashboard quick actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuickCounts {
    /// Pending orders created today.
    pub pending_today: usize,
    pub out_for_delivery: usize,
    pub payment_pending: usize,
}

/// Purchase history summary of one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberMetrics {
    pub total_spent: Decimal,
    pub order_count: usize,
    pub last_order: Option<DateTime<Utc>>,
    /// Average days between orders; `None` with fewer than two orders.
    pub frequency_days: Option<i64>,
}

pub fn totals(orders: &[Order]) -> OrderTotals {
    let revenue: Decimal = orders.iter().map(|o| o.total).sum();
    let order_count = orders.len();
    let distinct_members = orders
        .iter()
        .map(|o| o.member_id)
        .collect::<HashSet<_>>()
        .len();
    let average_ticket = if order_count == 0 {
        Decimal::ZERO
    } else {
        revenue / Decimal::from(order_count as u64)
    };
    OrderTotals {
        revenue,
        order_count,
        distinct_members,
        average_ticket,
    }
}

/// Calendar day of `at` at `offset`.
pub fn calendar_day(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

/// One bucket per day for the `days` days ending on `today`, oldest first.
///
/// Orders are bucketed by the calendar day of `created_at` at `offset`;
/// orders outside the window are ignored.
pub fn daily_buckets(
    orders: &[Order],
    today: NaiveDate,
    days: u32,
    offset: FixedOffset,
) -> Vec<DailyBucket> {
    if days == 0 {
        return Vec::new();
    }
    let start = today - Duration::days(i64::from(days) - 1);
    let mut buckets: BTreeMap<NaiveDate, DailyBucket> = start
        .iter_days()
        .take(days as usize)
        .map(|date| {
            (
                date,
                DailyBucket {
                    date,
                    total: Decimal::ZERO,
                    count: 0,
                },
            )
        })
        .collect();
    for order in orders {
        if let Some(bucket) = buckets.get_mut(&calendar_day(order.created_at, offset)) {
            bucket.total += order.total;
            bucket.count += 1;
        }
    }
    buckets.into_values().collect()
}

/// The `limit` varieties with the largest summed quantity, largest first.
pub fn top_varieties(orders: &[Order], limit: usize) -> Vec<VarietyShare> {
    let mut by_variety: HashMap<&str, Decimal> = HashMap::new();
    for order in orders {
        *by_variety.entry(order.variety.as_str()).or_default() += order.quantity;
    }
    let mut shares: Vec<VarietyShare> = by_variety
        .into_iter()
        .map(|(variety, quantity)| VarietyShare {
            variety: variety.to_string(),
            quantity,
        })
        .collect();
    shares.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then_with(|| a.variety.cmp(&b.variety))
    });
    shares.truncate(limit);
    shares
}

pub fn status_counts(orders: &[Order]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for order in orders {
        match order.status {
            OrderStatus::Pending => counts.pending += 1,
            OrderStatus::OutForDelivery => counts.out_for_delivery += 1,
            OrderStatus::Delivered => counts.delivered += 1,
        }
    }
    counts
}

/// Quick-action counters; "today" is `today` at `offset`.
pub fn quick_counts(orders: &[Order], today: NaiveDate, offset: FixedOffset) -> QuickCounts {
    QuickCounts {
        pending_today: orders
            .iter()
            .filter(|o| {
                o.status == OrderStatus::Pending && calendar_day(o.created_at, offset) == today
            })
            .count(),
        out_for_delivery: orders
            .iter()
            .filter(|o| o.status == OrderStatus::OutForDelivery)
            .count(),
        payment_pending: orders
            .iter()
            .filter(|o| o.payment_status == PaymentStatus::Pending)
            .count(),
    }
}

/// Average days between a member's orders.
///
/// The span from first to last order is rounded up to whole days, divided
/// by the number of gaps and rounded to the nearest day.
pub fn order_frequency_days(orders: &[Order]) -> Option<i64> {
    if orders.len() < 2 {
        return None;
    }
    let first = orders.iter().map(|o| o.created_at).min()?;
    let last = orders.iter().map(|o| o.created_at).max()?;
    let span_ms = (last - first).num_milliseconds();
    let span_days = (span_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    let gaps = (orders.len() - 1) as f64;
    Some((span_days as f64 / gaps).round() as i64)
}

pub fn member_metrics(orders: &[Order]) -> MemberMetrics {
    MemberMetrics {
        total_spent: orders.iter().map(|o| o.total).sum(),
        order_count: orders.len(),
        last_order: orders.iter().map(|o| o.created_at).max(),
        frequency_days: order_frequency_days(orders),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::fixtures::{at, member, order, order_for, today, utc};

    #[test]
    fn test_totals() {
        let ana = member("Ana", None);
        let orders = vec![
            order_for(&ana, "Amnesia", 5, 25000, 0),
            order_for(&ana, "Critical", 5, 15000, 1),
            order_for(&member("Beto", None), "Amnesia", 2, 20000, 2),
        ];
        let t = totals(&orders);
        assert_eq!(t.revenue, Decimal::from(60000));
        assert_eq!(t.order_count, 3);
        assert_eq!(t.distinct_members, 2);
        assert_eq!(t.average_ticket, Decimal::from(20000));

        assert_eq!(totals(&[]).average_ticket, Decimal::ZERO);
    }

    #[test]
    fn test_daily_buckets_sum_matches_window() {
        let ana = member("Ana", None);
        let orders = vec![
            order_for(&ana, "Amnesia", 1, 100, 0),
            order_for(&ana, "Amnesia", 1, 250, 0),
            order_for(&ana, "Amnesia", 1, 300, 29),
            order_for(&ana, "Amnesia", 1, 999, 30),
            order_for(&ana, "Amnesia", 1, 777, -1),
        ];
        let buckets = daily_buckets(&orders, today(), 30, utc());
        assert_eq!(buckets.len(), 30);
        assert_eq!(buckets[0].date, today() - Duration::days(29));
        assert_eq!(buckets[29].date, today());
        assert_eq!(buckets[29].count, 2);
        assert_eq!(buckets[29].total, Decimal::from(350));

        let window_start = today() - Duration::days(29);
        let expected: Decimal = orders
            .iter()
            .filter(|o| {
                let d = calendar_day(o.created_at, utc());
                d >= window_start && d <= today()
            })
            .map(|o| o.total)
            .sum();
        let bucketed: Decimal = buckets.iter().map(|b| b.total).sum();
        assert_eq!(bucketed, expected);
        assert_eq!(bucketed, Decimal::from(650));

        assert!(daily_buckets(&orders, today(), 0, utc()).is_empty());
    }

    #[test]
    fn test_evening_order_counts_on_local_day() {
        let litoral = FixedOffset::west_opt(3 * 3600).unwrap();
        // 23:30 on the 15th at UTC-3.
        let mut late = order_for(&member("Ana", None), "Amnesia", 1, 500, 0);
        late.created_at = at(0) + Duration::hours(14) + Duration::minutes(30);
        assert_eq!(late.created_at.date_naive(), today() + Duration::days(1));

        let quick = quick_counts(std::slice::from_ref(&late), today(), litoral);
        assert_eq!(quick.pending_today, 1);

        let buckets = daily_buckets(std::slice::from_ref(&late), today(), 30, litoral);
        let last = buckets.last().unwrap();
        assert_eq!(last.date, today());
        assert_eq!(last.count, 1);
        assert_eq!(last.total, Decimal::from(500));

        assert_eq!(quick_counts(&[late], today(), utc()).pending_today, 0);
    }

    #[test]
    fn test_top_varieties_sums_quantity() {
        let ana = member("Ana", None);
        let orders = vec![
            order_for(&ana, "Amnesia", 5, 0, 0),
            order_for(&ana, "Critical", 8, 0, 0),
            order_for(&ana, "Amnesia", 5, 0, 0),
            order_for(&ana, "Gelato", 1, 0, 0),
        ];
        let top = top_varieties(&orders, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].variety, "Amnesia");
        assert_eq!(top[0].quantity, Decimal::from(10));
        assert_eq!(top[1].variety, "Critical");
    }

    #[test]
    fn test_status_and_quick_counts() {
        let orders = vec![
            order("A", "x", 1, 1, OrderStatus::Pending, PaymentStatus::Pending, 0),
            order("B", "x", 1, 1, OrderStatus::Pending, PaymentStatus::Confirmed, 3),
            order("C", "x", 1, 1, OrderStatus::OutForDelivery, PaymentStatus::Pending, 0),
            order("D", "x", 1, 1, OrderStatus::Delivered, PaymentStatus::Confirmed, 1),
        ];
        let counts = status_counts(&orders);
        assert_eq!(counts.count(OrderStatus::Pending), 2);
        assert_eq!(counts.out_for_delivery, 1);
        assert_eq!(counts.delivered, 1);

        let quick = quick_counts(&orders, today(), utc());
        assert_eq!(quick.pending_today, 1);
        assert_eq!(quick.out_for_delivery, 1);
        assert_eq!(quick.payment_pending, 2);
    }

    #[test]
    fn test_frequency_needs_two_orders() {
        let ana = member("Ana", None);
        assert_eq!(order_frequency_days(&[]), None);
        assert_eq!(order_frequency_days(&[order_for(&ana, "x", 1, 1, 0)]), None);
    }

    #[test]
    fn test_frequency_two_orders_ten_days_apart() {
        let ana = member("Ana", None);
        let orders = vec![order_for(&ana, "x", 1, 1, 0), order_for(&ana, "x", 1, 1, 10)];
        assert_eq!(order_frequency_days(&orders), Some(10));
    }

    #[test]
    fn test_frequency_rounds_partial_days_up_then_averages() {
        let ana = member("Ana", None);
        let mut late = order_for(&ana, "x", 1, 1, 0);
        late.created_at = at(0) + Duration::hours(1);
        let orders = vec![late, order_for(&ana, "x", 1, 1, 10)];
        assert_eq!(order_frequency_days(&orders), Some(11));

        let orders = vec![
            order_for(&ana, "x", 1, 1, 0),
            order_for(&ana, "x", 1, 1, 6),
            order_for(&ana, "x", 1, 1, 15),
        ];
        assert_eq!(order_frequency_days(&orders), Some(8));
    }

    #[test]
    fn test_member_metrics() {
        let ana = member("Ana", None);
        let orders = vec![
            order_for(&ana, "x", 1, 25000, 0),
            order_for(&ana, "x", 1, 5000, 10),
        ];
        let metrics = member_metrics(&orders);
        assert_eq!(metrics.total_spent, Decimal::from(30000));
        assert_eq!(metrics.order_count, 2);
        assert_eq!(metrics.last_order, Some(at(0)));
        assert_eq!(metrics.frequency_days, Some(10));
    }
}
