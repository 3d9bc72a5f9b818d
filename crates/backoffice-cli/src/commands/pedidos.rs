//! Order (pedido) commands.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use backoffice_core::types::{MemberId, OrderId};
use backoffice_entity::order::{
    FulfillmentMode, Order, OrderDraft, OrderStatus, PaymentMethod, PaymentStatus,
};
use backoffice_service::views::{
    OrderFilter, PaymentFilter, StatusFilter, capitalize, format_amount,
};
use backoffice_service::{AppServices, Notice};

use crate::output::{self, OutputFormat, fail};

/// Arguments for order commands
#[derive(Debug, Args)]
pub struct PedidosArgs {
    #[command(subcommand)]
    pub command: PedidosCommand,
}

/// Order form fields shared by `add` and `edit`
#[derive(Debug, Args)]
pub struct OrderForm {
    /// Member ID
    #[arg(short, long)]
    member: Option<MemberId>,
    /// Variety
    #[arg(short, long)]
    variety: Option<String>,
    /// Quantity in grams
    #[arg(short, long)]
    quantity: Option<Decimal>,
    /// Total price
    #[arg(short, long)]
    total: Option<Decimal>,
    /// Deliver instead of pickup
    #[arg(long)]
    delivery: bool,
    /// Delivery address
    #[arg(short, long)]
    address: Option<String>,
    /// Payment method: efectivo, transferencia
    #[arg(long)]
    payment_method: Option<PaymentMethod>,
    /// Payment status: pendiente, confirmado
    #[arg(long)]
    payment: Option<PaymentStatus>,
    /// Order status: pendiente, en_reparto, entregado
    #[arg(long)]
    status: Option<OrderStatus>,
    /// Delivery date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Delivery window, e.g. 18-20
    #[arg(long)]
    window: Option<String>,
}

impl OrderForm {
    /// Overlay the given fields on `draft`.
    fn apply(&self, mut draft: OrderDraft) -> OrderDraft {
        if let Some(member) = self.member {
            draft = draft.member(member);
        }
        if let Some(variety) = &self.variety {
            draft = draft.variety(variety.clone());
        }
        if let Some(quantity) = self.quantity {
            draft = draft.quantity(quantity);
        }
        if let Some(total) = self.total {
            draft = draft.total(total);
        }
        if self.delivery {
            draft = draft.mode(FulfillmentMode::Delivery);
        }
        if let Some(address) = &self.address {
            draft = draft.address(address.clone());
        }
        if let Some(method) = self.payment_method {
            draft = draft.payment_method(method);
        }
        if let Some(payment) = self.payment {
            draft = draft.payment_status(payment);
        }
        if let Some(status) = self.status {
            draft = draft.status(status);
        }
        if self.date.is_some() {
            draft = draft.delivery_date(self.date);
        }
        if self.window.is_some() {
            draft = draft.delivery_window(self.window.clone());
        }
        draft
    }
}

/// Order subcommands
#[derive(Debug, Subcommand)]
pub enum PedidosCommand {
    /// List orders, newest first
    List {
        /// Status filter: all, pendiente, en_reparto, entregado
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
        /// Payment filter: all, pendiente, confirmado
        #[arg(short, long, default_value = "all")]
        payment: PaymentFilter,
        /// Text matched against variety and member name
        #[arg(short = 'q', long)]
        search: Option<String>,
    },
    /// Create an order (quick-order defaults: one gram, delivered today)
    Add(OrderForm),
    /// Edit every field of an order
    Edit {
        /// Order ID
        id: OrderId,
        #[command(flatten)]
        form: OrderForm,
    },
    /// Change the status of an order
    Status {
        /// Order ID
        id: OrderId,
        /// New status
        status: OrderStatus,
        /// Also set the payment status
        #[arg(short, long)]
        payment: Option<PaymentStatus>,
    },
    /// Toggle the payment status of an order
    TogglePayment {
        /// Order ID
        id: OrderId,
    },
    /// Delete an order
    Delete {
        /// Order ID
        id: OrderId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Order display row for table output
#[derive(Debug, Serialize, Tabled)]
struct OrderRow {
    id: String,
    fecha: String,
    socio: String,
    variedad: String,
    cantidad: String,
    total: String,
    modalidad: String,
    estado: String,
    pago: String,
}

impl From<&Order> for OrderRow {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id.to_string(),
            fecha: o.created_at.format("%Y-%m-%d").to_string(),
            socio: o.member_name().unwrap_or("-").to_string(),
            variedad: o.variety.clone(),
            cantidad: format!("{}g", o.quantity),
            total: format_amount(o.total),
            modalidad: capitalize(o.mode.as_str()),
            estado: capitalize(o.status.as_str()),
            pago: capitalize(o.payment_status.as_str()),
        }
    }
}

/// Execute order commands
pub async fn execute(
    args: &PedidosArgs,
    services: &AppServices,
    format: OutputFormat,
) -> Result<(), Notice> {
    let orders = &services.orders;
    match &args.command {
        PedidosCommand::List {
            status,
            payment,
            search,
        } => {
            orders.load().await.map_err(fail("Error al cargar datos"))?;
            let mut filter = OrderFilter::default().status(*status).payment(*payment);
            if let Some(term) = search {
                filter = filter.text(term.clone());
            }
            let rows: Vec<OrderRow> = orders
                .filtered(&filter)
                .await
                .iter()
                .map(OrderRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        PedidosCommand::Add(form) => {
            services.context.open_quick_order();
            let draft = form.apply(OrderDraft::quick(services.dashboard.today()));
            let result = orders.create(draft).await;
            services.context.close_quick_order();
            let order = result.map_err(fail("Error al crear pedido"))?;
            output::print_notice(&Notice::success(format!("Pedido creado: {}", order.id)));
        }
        PedidosCommand::Edit { id, form } => {
            let current = orders.get(*id).await.map_err(fail("Error al cargar datos"))?;
            let draft = form.apply(OrderDraft::from_order(&current));
            orders
                .update(*id, draft)
                .await
                .map_err(fail("Error al guardar pedido"))?;
            output::print_notice(&Notice::success("Pedido actualizado"));
        }
        PedidosCommand::Status {
            id,
            status,
            payment,
        } => {
            orders.load().await.map_err(fail("Error al cargar datos"))?;
            let result = match payment {
                Some(payment) => orders.set_statuses(*id, *status, *payment).await,
                None => orders.set_status(*id, *status).await,
            };
            result.map_err(fail("Error al actualizar estado"))?;
            output::print_notice(&Notice::success("Estado actualizado"));
        }
        PedidosCommand::TogglePayment { id } => {
            orders.load().await.map_err(fail("Error al cargar datos"))?;
            let next = orders
                .toggle_payment(*id)
                .await
                .map_err(fail("Error al actualizar pago"))?;
            output::print_notice(&Notice::success(format!("Pago {next}")));
        }
        PedidosCommand::Delete { id, yes } => {
            if !output::confirm(&format!("¿Eliminar el pedido {id}?"), *yes)? {
                output::print_notice(&Notice::info("Operación cancelada"));
                return Ok(());
            }
            orders
                .delete(*id)
                .await
                .map_err(fail("Error al eliminar pedido"))?;
            output::print_notice(&Notice::success("Pedido eliminado"));
        }
    }
    Ok(())
}
