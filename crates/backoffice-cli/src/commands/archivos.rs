//! Attached file commands.

use std::path::PathBuf;

use bytes::Bytes;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use backoffice_core::types::{FileId, MemberId};
use backoffice_entity::attachment::AttachedFile;
use backoffice_service::views::format_file_size;
use backoffice_service::{AppServices, Notice};

use crate::output::{self, OutputFormat, fail};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct ArchivosArgs {
    #[command(subcommand)]
    pub command: ArchivosCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum ArchivosCommand {
    /// List the files of a member
    List {
        /// Member ID
        member: MemberId,
    },
    /// Upload an image or PDF for a member
    Upload {
        /// Member ID
        member: MemberId,
        /// Local file to upload
        path: PathBuf,
    },
    /// Delete a file of a member
    Delete {
        /// Member ID
        member: MemberId,
        /// File ID
        file: FileId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// File display row for table output
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    id: String,
    nombre: String,
    tipo: String,
    peso: String,
    fecha: String,
    url: String,
}

impl From<&AttachedFile> for FileRow {
    fn from(f: &AttachedFile) -> Self {
        Self {
            id: f.id.to_string(),
            nombre: f.name.clone(),
            tipo: f.mime_type.clone(),
            peso: format_file_size(f.size),
            fecha: f.created_at.format("%Y-%m-%d").to_string(),
            url: f.url.clone(),
        }
    }
}

/// Execute file commands
pub async fn execute(
    args: &ArchivosArgs,
    services: &AppServices,
    format: OutputFormat,
) -> Result<(), Notice> {
    let files = &services.files;
    match &args.command {
        ArchivosCommand::List { member } => {
            let list = files
                .list(*member)
                .await
                .map_err(fail("Error al cargar archivos"))?;
            let rows: Vec<FileRow> = list.iter().map(FileRow::from).collect();
            output::print_list(&rows, format);
        }
        ArchivosCommand::Upload { member, path } => {
            let data = tokio::fs::read(path)
                .await
                .map_err(|e| Notice::error(format!("No se pudo leer {}: {e}", path.display())))?;
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| Notice::error("Nombre de archivo inválido"))?;
            let file = files
                .upload(*member, filename, Bytes::from(data), None)
                .await
                .map_err(fail("Error al subir archivo"))?;
            output::print_notice(&Notice::success(format!(
                "Archivo subido ({})",
                format_file_size(file.size)
            )));
        }
        ArchivosCommand::Delete { member, file, yes } => {
            let list = files
                .list(*member)
                .await
                .map_err(fail("Error al cargar archivos"))?;
            let target = list
                .iter()
                .find(|f| f.id == *file)
                .ok_or_else(|| Notice::error("Archivo no encontrado"))?;
            if !output::confirm(&format!("¿Eliminar {}?", target.name), *yes)? {
                output::print_notice(&Notice::info("Operación cancelada"));
                return Ok(());
            }
            files
                .delete(target)
                .await
                .map_err(fail("Error al eliminar archivo"))?;
            output::print_notice(&Notice::success("Archivo eliminado"));
        }
    }
    Ok(())
}
