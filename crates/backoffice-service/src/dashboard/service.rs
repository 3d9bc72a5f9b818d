//! Builds the dashboard from the order list and the latest notifications.

use chrono::NaiveDate;
use serde::Serialize;

use backoffice_backend::Backend;
use backoffice_backend::repositories::{NotificationRepository, OrderRepository};
use backoffice_core::AppResult;
use backoffice_core::config::DashboardConfig;
use backoffice_entity::notification::Notification;
use backoffice_entity::order::Order;

use crate::views::{self, DailyBucket, OrderTotals, QuickCounts, StatusCounts, VarietyShare};

/// Everything the dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub today: NaiveDate,
    pub totals: OrderTotals,
    pub quick: QuickCounts,
    /// Revenue per day over the trailing window, oldest first.
    pub daily: Vec<DailyBucket>,
    pub top_varieties: Vec<VarietyShare>,
    pub status_counts: StatusCounts,
    /// Most recent notifications, newest first.
    pub recent_activity: Vec<Notification>,
}

impl DashboardSummary {
    /// Derive the summary from loaded collections, bucketing days at the
    /// configured calendar offset.
    pub fn build(
        orders: &[Order],
        notifications: &[Notification],
        today: NaiveDate,
        config: &DashboardConfig,
    ) -> Self {
        let offset = config.calendar_offset();
        Self {
            today,
            totals: views::totals(orders),
            quick: views::quick_counts(orders, today, offset),
            daily: views::daily_buckets(orders, today, config.trailing_days, offset),
            top_varieties: views::top_varieties(orders, config.top_varieties),
            status_counts: views::status_counts(orders),
            recent_activity: notifications
                .iter()
                .take(config.recent_activity)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    orders: OrderRepository,
    notifications: NotificationRepository,
    config: DashboardConfig,
}

impl DashboardService {
    pub fn new(backend: &Backend, config: DashboardConfig) -> Self {
        Self {
            orders: backend.orders(),
            notifications: backend.notifications(),
            config,
        }
    }

    /// Today's calendar day at the configured offset.
    pub fn today(&self) -> NaiveDate {
        self.config.today()
    }

    /// Load orders and notifications and summarize them as of today.
    pub async fn load(&self) -> AppResult<DashboardSummary> {
        let orders = self.orders.list().await?;
        let notifications = self
            .notifications
            .latest(self.config.notification_limit)
            .await?;
        Ok(DashboardSummary::build(
            &orders,
            &notifications,
            self.today(),
            &self.config,
        ))
    }
}
