//! Read access to geodatabase attachment tables.
//!
//! ESRI mobile geodatabases and OGC GeoPackages are SQLite files; attachment
//! tables inside them carry the columns `ATTACHMENTID`, `ATT_NAME` and `DATA`.

use anyhow::{bail, Context, Result};
use rusqlite::{types::Value, Connection, OpenFlags, OptionalExtension};
use std::{fmt, path::PathBuf, str::FromStr};

use crate::errors::{Error, Result as ExportResult};

/// Table name used when the source identifier does not name one.
pub const DEFAULT_ATTACHMENT_TABLE: &str = "ATTACH";

/// An attachment table addressed as `<geodatabase-path>[:<table-name>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIdentifier {
    pub database: PathBuf,
    pub table: String,
}

impl FromStr for SourceIdentifier {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> Result<Self> {
        if string.is_empty() {
            bail!("Empty source identifier");
        }
        // A trailing `:<segment>` only counts as a table name when the segment
        // is a plain identifier, so Windows drive-letter paths stay paths.
        Ok(match string.rsplit_once(':') {
            Some((database, table)) if is_table_name(table) => SourceIdentifier {
                database: PathBuf::from(database),
                table: table.to_owned(),
            },
            _ => SourceIdentifier {
                database: PathBuf::from(string),
                table: DEFAULT_ATTACHMENT_TABLE.to_owned(),
            },
        })
    }
}

impl fmt::Display for SourceIdentifier {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}:{}", self.database.display(), self.table)
    }
}

fn is_table_name(string: &str) -> bool {
    !string.is_empty()
        && string
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || character == '_')
}

/// One record from an attachment table: the binary payload plus the metadata
/// its output filename is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRow {
    pub attachment_id: String,
    pub name: String,
    pub data: Vec<u8>,
}

impl AttachmentRow {
    /// Filename the attachment is exported under.
    pub fn export_filename(&self) -> String {
        format!("ATT{}_{}", self.attachment_id, self.name)
    }
}

/// A forward-only producer of attachment rows. The exporter pulls one row at
/// a time, so payloads are never buffered beyond the row in hand.
pub trait AttachmentSource {
    fn next_row(&mut self) -> Result<Option<AttachmentRow>>;
}

/// An attachment table inside a SQLite geodatabase, opened read-only.
pub struct GeodatabaseTable {
    connection: Connection,
    identifier: SourceIdentifier,
    row_query: String,
    rowids: std::vec::IntoIter<i64>,
}

impl GeodatabaseTable {
    /// Opens the table, failing with [`Error::SourceNotFound`] when the
    /// geodatabase file or the table inside it is missing.
    pub fn open(identifier: &SourceIdentifier) -> ExportResult<Self> {
        if !identifier.database.is_file() {
            return Err(Error::SourceNotFound(identifier.to_string()));
        }

        let connection = Connection::open_with_flags(
            &identifier.database,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| {
            format!(
                "Could not open geodatabase `{}`",
                identifier.database.display()
            )
        })?;

        let table_exists = connection
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [identifier.table.as_str()],
                |_| Ok(()),
            )
            .optional()
            .with_context(|| {
                format!(
                    "Could not look up table `{}` in `{}`",
                    identifier.table,
                    identifier.database.display()
                )
            })?;
        if table_exists.is_none() {
            return Err(Error::SourceNotFound(identifier.to_string()));
        }

        // Rowids are listed up front; the payloads themselves are pulled one
        // row at a time as the exporter asks for them.
        let quoted_table = format!("\"{}\"", identifier.table.replace('"', "\"\""));
        let rowids = {
            let mut statement = connection
                .prepare(&format!("SELECT rowid FROM {quoted_table}"))
                .with_context(|| format!("Could not query rows of `{identifier}`"))?;
            let rowids = statement
                .query_map([], |row| row.get(0))
                .with_context(|| format!("Could not query rows of `{identifier}`"))?
                .collect::<rusqlite::Result<Vec<i64>>>()
                .with_context(|| format!("Could not read row ids of `{identifier}`"))?;
            rowids
        };

        let row_query =
            format!("SELECT ATTACHMENTID, ATT_NAME, DATA FROM {quoted_table} WHERE rowid = ?1");

        Ok(GeodatabaseTable {
            connection,
            identifier: identifier.clone(),
            row_query,
            rowids: rowids.into_iter(),
        })
    }
}

impl AttachmentSource for GeodatabaseTable {
    fn next_row(&mut self) -> Result<Option<AttachmentRow>> {
        let Some(rowid) = self.rowids.next() else {
            return Ok(None);
        };

        let (attachment_id, name, data) = self
            .connection
            .query_row(&self.row_query, [rowid], |row| {
                Ok((
                    row.get::<_, Value>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<Vec<u8>>>(2)?,
                ))
            })
            .with_context(|| {
                format!(
                    "Failed to read attachment row {rowid} from `{}`",
                    self.identifier
                )
            })?;

        let attachment_id = match attachment_id {
            Value::Integer(id) => id.to_string(),
            Value::Text(id) => id,
            other => bail!(
                "Unsupported ATTACHMENTID value of type {} in `{}`",
                other.data_type(),
                self.identifier
            ),
        };

        Ok(Some(AttachmentRow {
            attachment_id,
            name,
            // A NULL payload is exported as an empty file.
            data: data.unwrap_or_default(),
        }))
    }
}
