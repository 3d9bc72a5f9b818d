//! CLI command definitions and dispatch.

pub mod archivos;
pub mod dashboard;
pub mod notificaciones;
pub mod pedidos;
pub mod socios;

use clap::{Parser, Subcommand};

use backoffice_core::config::AppConfig;
use backoffice_service::{AppServices, Notice};

use crate::output::{OutputFormat, fail};

/// Back-office for socios and pedidos
#[derive(Debug, Parser)]
#[command(name = "backoffice-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/{env}.toml`)
    #[arg(short, long, env = "BACKOFFICE_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands, one per screen
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Member management
    Socios(socios::SociosArgs),
    /// Order management
    Pedidos(pedidos::PedidosArgs),
    /// Notifications
    Notificaciones(notificaciones::NotificacionesArgs),
    /// Dashboard metrics
    Dashboard,
    /// Files attached to members
    Archivos(archivos::ArchivosArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), Notice> {
        let services = self.connect().await?;
        match &self.command {
            Commands::Socios(args) => socios::execute(args, &services, self.format).await,
            Commands::Pedidos(args) => pedidos::execute(args, &services, self.format).await,
            Commands::Notificaciones(args) => {
                notificaciones::execute(args, &services, self.format).await
            }
            Commands::Dashboard => dashboard::execute(&services, self.format).await,
            Commands::Archivos(args) => archivos::execute(args, &services, self.format).await,
        }
    }

    async fn connect(&self) -> Result<AppServices, Notice> {
        let config =
            AppConfig::load(&self.config, &self.env).map_err(fail("Error de configuración"))?;
        AppServices::connect(&config)
            .await
            .map_err(fail("Error al conectar con el backend"))
    }
}
