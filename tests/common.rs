use once_cell::sync::Lazy;
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::Command,
};

pub struct TestCli {
    cli_path: PathBuf,
}

impl TestCli {
    pub fn get() -> &'static Self {
        static TEST_CLI: Lazy<TestCli> = Lazy::new(|| {
            let cli_path = std::env::current_exe()
                .ok()
                .and_then(|path| Some(path.parent()?.parent()?.join("gdbattach")))
                .expect("Could not resolve CLI executable from test executable");

            TestCli { cli_path }
        });

        &TEST_CLI
    }

    pub fn command(&self) -> Command {
        Command::new(&self.cli_path)
    }

    /// Runs the CLI and returns its log output (the messages go to stderr),
    /// panicking unless it exits successfully.
    pub fn run(&self, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> String {
        let output = self.command().args(args).output().unwrap();

        if !output.status.success() {
            panic!(
                "failed to run command:\n{}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        String::from_utf8(output.stderr).unwrap()
    }

    /// Runs the CLI and returns its log output, panicking unless it fails.
    pub fn run_and_error(&self, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> String {
        let output = self.command().args(args).output().unwrap();

        if output.status.success() {
            panic!(
                "succeeded running command (expected failure):\n{}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        String::from_utf8(output.stderr).unwrap()
    }
}

/// Creates a SQLite geodatabase at `path` holding one attachment table with
/// the given rows.
pub fn create_attachment_table(path: &Path, table: &str, rows: &[(i64, &str, &[u8])]) {
    let connection = rusqlite::Connection::open(path).unwrap();
    connection
        .execute_batch(&format!(
            "CREATE TABLE \"{table}\" (
                ATTACHMENTID INTEGER,
                ATT_NAME TEXT NOT NULL,
                DATA BLOB
            )"
        ))
        .unwrap();
    for (attachment_id, name, data) in rows {
        connection
            .execute(
                &format!(
                    "INSERT INTO \"{table}\" (ATTACHMENTID, ATT_NAME, DATA) VALUES (?1, ?2, ?3)"
                ),
                rusqlite::params![attachment_id, name, data],
            )
            .unwrap();
    }
}
