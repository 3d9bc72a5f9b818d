//! Derived views: pure functions over loaded collections.

pub mod filter;
pub mod format;
pub mod metrics;

pub use filter::{OrderFilter, PaymentFilter, StatusFilter, search_members};
pub use format::{capitalize, format_amount, format_file_size};
pub use metrics::{
    DailyBucket, MemberMetrics, OrderTotals, QuickCounts, StatusCounts, VarietyShare,
    calendar_day, daily_buckets, member_metrics, order_frequency_days, quick_counts, status_counts,
    top_varieties, totals,
};
