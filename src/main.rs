//! Back-office app shell.
//!
//! Loads configuration, signs in, logs the dashboard summary and follows
//! pushed notifications until Ctrl-C.

use tracing_subscriber::{EnvFilter, fmt};

use backoffice_core::config::AppConfig;
use backoffice_core::error::AppError;
use backoffice_entity::notification::Notification;
use backoffice_service::AppServices;
use backoffice_service::views::format_amount;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(kind = %e.kind, "Back-office stopped: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay and variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("BACKOFFICE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("BACKOFFICE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting back-office v{}", env!("CARGO_PKG_VERSION"));

    let services = AppServices::connect(&config).await?;
    if services.backend.auth.session().await.is_none() {
        tracing::warn!("No account configured; remote calls use the anonymous key");
    }

    match services.dashboard.load().await {
        Ok(summary) => {
            tracing::info!(
                revenue = %format_amount(summary.totals.revenue),
                orders = summary.totals.order_count,
                members = summary.totals.distinct_members,
                average_ticket = %format_amount(summary.totals.average_ticket),
                "Dashboard"
            );
            tracing::info!(
                pending_today = summary.quick.pending_today,
                out_for_delivery = summary.quick.out_for_delivery,
                payment_pending = summary.quick.payment_pending,
                "Quick actions"
            );
            for share in &summary.top_varieties {
                tracing::info!(variety = %share.variety, quantity = %share.quantity, "Top variety");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Dashboard unavailable"),
    }

    if let Err(e) = services.notifications.fetch().await {
        tracing::warn!(error = %e, "Notifications unavailable");
    }
    let subscription = services
        .notifications
        .subscribe_with(|n: &Notification| {
            tracing::info!(
                id = %n.id,
                kind = %n.kind,
                order = ?n.order_id,
                "{}: {}",
                n.title,
                n.description
            );
        })
        .await?;
    tracing::info!(
        unread = services.notifications.unread_count(),
        "Following notifications; press Ctrl-C to stop"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Ctrl-C handler failed");
    }

    subscription.unsubscribe();
    if let Err(e) = services.sign_out().await {
        tracing::warn!(error = %e, "Sign-out failed");
    }
    tracing::info!("Back-office stopped");
    Ok(())
}
