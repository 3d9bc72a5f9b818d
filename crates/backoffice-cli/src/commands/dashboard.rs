//! Dashboard command.

use serde::Serialize;
use tabled::Tabled;

use backoffice_entity::order::OrderStatus;
use backoffice_service::views::{capitalize, format_amount};
use backoffice_service::{AppServices, DashboardSummary, Notice};

use crate::output::{self, OutputFormat, fail};

/// One day of the revenue chart
#[derive(Debug, Serialize, Tabled)]
struct DayRow {
    dia: String,
    pedidos: usize,
    ingresos: String,
}

/// One variety of the top-varieties chart
#[derive(Debug, Serialize, Tabled)]
struct VarietyRow {
    variedad: String,
    cantidad: String,
}

/// Print the dashboard
pub async fn execute(services: &AppServices, format: OutputFormat) -> Result<(), Notice> {
    let summary = services
        .dashboard
        .load()
        .await
        .map_err(fail("Error al cargar datos"))?;
    if format == OutputFormat::Json {
        output::print_json(&summary);
        return Ok(());
    }
    print_summary(&summary);
    Ok(())
}

/// Render a summary as text tables.
fn print_summary(summary: &DashboardSummary) {
    output::print_heading("Resumen");
    output::print_kv("Ingresos totales", &format_amount(summary.totals.revenue));
    output::print_kv("Pedidos", &summary.totals.order_count.to_string());
    output::print_kv("Socios activos", &summary.totals.distinct_members.to_string());
    output::print_kv("Ticket promedio", &format_amount(summary.totals.average_ticket));

    output::print_heading("Acciones rápidas");
    output::print_kv("Pendientes hoy", &summary.quick.pending_today.to_string());
    output::print_kv("En reparto", &summary.quick.out_for_delivery.to_string());
    output::print_kv("Pagos pendientes", &summary.quick.payment_pending.to_string());

    output::print_heading("Estado de pedidos");
    for status in OrderStatus::ALL {
        output::print_kv(
            &capitalize(status.as_str()),
            &summary.status_counts.count(status).to_string(),
        );
    }

    output::print_heading("Ingresos por día");
    let days: Vec<DayRow> = summary
        .daily
        .iter()
        .filter(|b| b.count > 0)
        .map(|b| DayRow {
            dia: b.date.format("%d/%m").to_string(),
            pedidos: b.count,
            ingresos: format_amount(b.total),
        })
        .collect();
    output::print_list(&days, OutputFormat::Table);

    output::print_heading("Top variedades");
    let varieties: Vec<VarietyRow> = summary
        .top_varieties
        .iter()
        .map(|v| VarietyRow {
            variedad: v.variety.clone(),
            cantidad: format!("{}g", v.quantity),
        })
        .collect();
    output::print_list(&varieties, OutputFormat::Table);

    output::print_heading("Actividad reciente");
    if summary.recent_activity.is_empty() {
        println!("Sin actividad.");
    }
    for n in &summary.recent_activity {
        let marker = if n.read { " " } else { "*" };
        println!(
            "{marker} {} {}: {}",
            n.created_at.format("%d/%m %H:%M"),
            n.title,
            n.description
        );
    }
}
