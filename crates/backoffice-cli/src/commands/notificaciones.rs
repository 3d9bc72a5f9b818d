//! Notification commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use backoffice_core::types::{NotificationId, OrderId};
use backoffice_entity::notification::{CreateNotification, Notification, NotificationKind};
use backoffice_service::{AppServices, Destination, Notice};

use crate::output::{self, OutputFormat, fail};

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificacionesArgs {
    #[command(subcommand)]
    pub command: NotificacionesCommand,
}

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificacionesCommand {
    /// List the latest notifications
    List,
    /// Mark one notification as read
    Read {
        /// Notification ID
        id: NotificationId,
    },
    /// Mark every notification as read
    ReadAll,
    /// Open a notification: mark it read and show where it leads
    Open {
        /// Notification ID
        id: NotificationId,
    },
    /// Publish a notification
    Send {
        /// Title
        #[arg(short, long)]
        title: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Kind: info, success, warning, error
        #[arg(short, long, default_value = "info")]
        kind: NotificationKind,
        /// Referenced order
        #[arg(short, long)]
        order: Option<OrderId>,
    },
    /// Print notifications as they arrive until Ctrl-C
    Watch,
}

/// Notification display row for table output
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    id: String,
    fecha: String,
    tipo: String,
    titulo: String,
    descripcion: String,
    leida: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            fecha: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
            tipo: n.kind.to_string(),
            titulo: n.title.clone(),
            descripcion: n.description.clone(),
            leida: if n.read { "sí" } else { "no" }.to_string(),
        }
    }
}

/// Execute notification commands
pub async fn execute(
    args: &NotificacionesArgs,
    services: &AppServices,
    format: OutputFormat,
) -> Result<(), Notice> {
    let center = &services.notifications;
    match &args.command {
        NotificacionesCommand::List => {
            let list = center
                .fetch()
                .await
                .map_err(fail("Error al cargar notificaciones"))?;
            let rows: Vec<NotificationRow> = list.iter().map(NotificationRow::from).collect();
            output::print_list(&rows, format);
            output::print_notice(&Notice::info(format!(
                "{} sin leer",
                center.unread_count()
            )));
        }
        NotificacionesCommand::Read { id } => {
            center
                .fetch()
                .await
                .map_err(fail("Error al cargar notificaciones"))?;
            center
                .mark_read(*id)
                .await
                .map_err(fail("Error al marcar como leída"))?;
            output::print_notice(&Notice::success("Notificación leída"));
        }
        NotificacionesCommand::ReadAll => {
            let changed = center
                .mark_all_read()
                .await
                .map_err(fail("Error al marcar como leídas"))?;
            output::print_notice(&Notice::success(format!("{changed} notificaciones leídas")));
        }
        NotificacionesCommand::Open { id } => {
            center
                .fetch()
                .await
                .map_err(fail("Error al cargar notificaciones"))?;
            let destination = center
                .open(*id)
                .await
                .map_err(fail("Error al abrir notificación"))?;
            match destination {
                Destination::OrderDetail(order_id) => {
                    let order = services
                        .orders
                        .get(order_id)
                        .await
                        .map_err(fail("Error al cargar el pedido"))?;
                    if format == OutputFormat::Json {
                        output::print_json(&order);
                    } else {
                        output::print_heading(&format!("Pedido {}", order.id));
                        output::print_kv("Socio", order.member_name().unwrap_or("-"));
                        output::print_kv("Variedad", &order.variety);
                        output::print_kv("Estado", order.status.as_str());
                        output::print_kv("Pago", order.payment_status.as_str());
                    }
                }
                Destination::Stay => {
                    output::print_notice(&Notice::info("Notificación leída"));
                }
            }
        }
        NotificacionesCommand::Send {
            title,
            description,
            kind,
            order,
        } => {
            let mut data = CreateNotification::new(title.clone(), description.clone(), *kind);
            if let Some(order_id) = order {
                data = data.for_order(*order_id);
            }
            let notification = center
                .publish(data)
                .await
                .map_err(fail("Error al enviar notificación"))?;
            output::print_notice(&Notice::success(format!(
                "Notificación enviada: {}",
                notification.id
            )));
        }
        NotificacionesCommand::Watch => {
            center
                .fetch()
                .await
                .map_err(fail("Error al cargar notificaciones"))?;
            let subscription = center
                .subscribe_with(|n: &Notification| {
                    output::print_notice(&Notice::info(format!("{}: {}", n.title, n.description)));
                })
                .await
                .map_err(fail("Error al suscribirse a notificaciones"))?;
            output::print_notice(&Notice::info(format!(
                "Escuchando notificaciones ({} sin leer). Ctrl-C para salir.",
                center.unread_count()
            )));
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Ctrl-C handler failed");
            }
            subscription.unsubscribe();
        }
    }
    Ok(())
}
