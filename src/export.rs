//! The export procedure: validate the parameters, ensure the output
//! directory, then stream rows out of the attachment table and write one file
//! per row.

use anyhow::{Context, Result};
use log::info;
use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use crate::{
    errors::{Error, Result as ExportResult},
    source::{AttachmentSource, GeodatabaseTable, SourceIdentifier},
};

/// What an export run did, returned to the caller alongside the per-file log
/// messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub files_written: usize,
    pub created_directory: bool,
}

/// Exports every attachment of `table` into `output_dir`.
///
/// Both parameters are rejected when empty before any I/O happens, and the
/// source table must exist before the output directory is created or a single
/// row is read.
pub fn run(table: &str, output_dir: &str) -> ExportResult<ExportSummary> {
    if table.is_empty() {
        return Err(Error::MissingInput("Input table"));
    }
    if output_dir.is_empty() {
        return Err(Error::MissingInput("Output directory"));
    }

    let identifier: SourceIdentifier = table.parse().map_err(Error::Runtime)?;
    let mut source = GeodatabaseTable::open(&identifier)?;

    export(&mut source, Path::new(output_dir)).map_err(Error::Runtime)
}

/// The export loop over an already opened source.
///
/// Files written before a mid-run failure are left in place; there is no
/// rollback. Rows whose derived filenames collide silently overwrite each
/// other, last row wins.
pub fn export(
    source: &mut dyn AttachmentSource,
    destination: &Path,
) -> Result<ExportSummary> {
    let created_directory = ensure_output_directory(destination)?;

    let mut files_written = 0;
    while let Some(row) = source.next_row()? {
        let filename = row.export_filename();
        write_attachment(&destination.join(&filename), &row.data)
            .with_context(|| format!("Failed to write attachment `{filename}`"))?;
        info!("Saved attachment: {filename}");
        files_written += 1;
    }

    Ok(ExportSummary {
        files_written,
        created_directory,
    })
}

fn ensure_output_directory(destination: &Path) -> Result<bool> {
    if destination.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(destination).with_context(|| {
        format!(
            "Could not create output directory `{}`",
            destination.display()
        )
    })?;
    info!("Created directory: {}", destination.display());
    Ok(true)
}

fn write_attachment(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    Ok(())
}
