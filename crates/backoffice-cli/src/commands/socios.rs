//! Member (socio) commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use backoffice_core::types::MemberId;
use backoffice_entity::member::{CreateMember, Member, UpdateMember};
use backoffice_service::views::{capitalize, format_amount};
use backoffice_service::{AppServices, Notice};

use crate::output::{self, OutputFormat, fail};

/// Arguments for member commands
#[derive(Debug, Args)]
pub struct SociosArgs {
    #[command(subcommand)]
    pub command: SociosCommand,
}

/// Member subcommands
#[derive(Debug, Subcommand)]
pub enum SociosCommand {
    /// List members ordered by name
    List {
        /// Only members whose name or phone contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a member with their order history
    Show {
        /// Member ID
        id: MemberId,
    },
    /// Create a member
    Add {
        /// Full name
        #[arg(short, long)]
        name: String,
        /// Phone number
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Edit a member
    Edit {
        /// Member ID
        id: MemberId,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New phone number
        #[arg(short, long, conflicts_with = "clear_phone")]
        phone: Option<String>,
        /// Remove the phone number
        #[arg(long)]
        clear_phone: bool,
    },
    /// Delete a member
    Delete {
        /// Member ID
        id: MemberId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Member display row for table output
#[derive(Debug, Serialize, Tabled)]
struct MemberRow {
    id: String,
    nombre: String,
    telefono: String,
    alta: String,
}

impl From<&Member> for MemberRow {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id.to_string(),
            nombre: m.name.clone(),
            telefono: m.phone.clone().unwrap_or_else(|| "-".into()),
            alta: m.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Order history row
#[derive(Debug, Serialize, Tabled)]
struct HistoryRow {
    fecha: String,
    variedad: String,
    cantidad: String,
    total: String,
    estado: String,
    pago: String,
}

/// Execute member commands
pub async fn execute(
    args: &SociosArgs,
    services: &AppServices,
    format: OutputFormat,
) -> Result<(), Notice> {
    let members = &services.members;
    match &args.command {
        SociosCommand::List { search } => {
            let list = match search {
                Some(term) => members.search(term).await,
                None => members.list().await,
            }
            .map_err(fail("Error al cargar socios"))?;
            let rows: Vec<MemberRow> = list.iter().map(MemberRow::from).collect();
            output::print_list(&rows, format);
        }
        SociosCommand::Show { id } => {
            let history = members
                .history(*id)
                .await
                .map_err(fail("Error al cargar el historial"))?;
            if format == OutputFormat::Json {
                output::print_json(&history);
                return Ok(());
            }
            output::print_heading(&history.member.name);
            output::print_kv("Teléfono", history.member.phone.as_deref().unwrap_or("-"));
            output::print_kv("Total gastado", &format_amount(history.metrics.total_spent));
            output::print_kv("Pedidos", &history.metrics.order_count.to_string());
            output::print_kv(
                "Último pedido",
                &history
                    .metrics
                    .last_order
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".into()),
            );
            output::print_kv(
                "Frecuencia",
                &history
                    .metrics
                    .frequency_days
                    .map(|d| format!("{d} días"))
                    .unwrap_or_else(|| "N/A".into()),
            );
            let rows: Vec<HistoryRow> = history
                .orders
                .iter()
                .map(|o| HistoryRow {
                    fecha: o.created_at.format("%Y-%m-%d").to_string(),
                    variedad: o.variety.clone(),
                    cantidad: format!("{}g", o.quantity),
                    total: format_amount(o.total),
                    estado: capitalize(o.status.as_str()),
                    pago: capitalize(o.payment_status.as_str()),
                })
                .collect();
            output::print_list(&rows, format);
        }
        SociosCommand::Add { name, phone } => {
            let member = members
                .create(CreateMember::new(name.clone(), phone.clone()))
                .await
                .map_err(fail("Error al crear socio"))?;
            output::print_notice(&Notice::success(format!("Socio creado: {}", member.id)));
        }
        SociosCommand::Edit {
            id,
            name,
            phone,
            clear_phone,
        } => {
            let patch = UpdateMember {
                name: name.clone(),
                phone: if *clear_phone {
                    Some(None)
                } else {
                    phone.clone().map(Some)
                },
            };
            members
                .update(*id, patch)
                .await
                .map_err(fail("Error al actualizar socio"))?;
            output::print_notice(&Notice::success("Socio actualizado"));
        }
        SociosCommand::Delete { id, yes } => {
            if !output::confirm(&format!("¿Eliminar el socio {id}?"), *yes)? {
                output::print_notice(&Notice::info("Operación cancelada"));
                return Ok(());
            }
            members
                .delete(*id)
                .await
                .map_err(fail("Error al eliminar socio"))?;
            output::print_notice(&Notice::success("Socio eliminado"));
        }
    }
    Ok(())
}
