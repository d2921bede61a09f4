use structopt::StructOpt;

/// gdbattach copies the attachments stored in a geodatabase attachment table
/// out to individual files on disk.
#[derive(Debug, StructOpt)]
#[structopt(
    global_settings = &[
        structopt::clap::AppSettings::ColoredHelp,
    ]
)]
pub struct Args {
    #[structopt(name = "table")]
    /// Attachment table to export, as `<geodatabase>[:<table-name>]`. The
    /// table name defaults to ATTACH when omitted.
    pub table: String,

    #[structopt(name = "output-dir")]
    /// Directory the attachment files are written into. Created if missing.
    pub output_dir: String,

    #[structopt(short = "v", long = "verbose")]
    /// Enable more verbose logging.
    pub verbose: bool,
}
