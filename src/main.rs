#![deny(clippy::all)]

mod args;
mod errors;
mod export;
mod source;
mod utils;

use log::{error, info};
use std::{error::Error as _, process};
use structopt::StructOpt;

use crate::{args::Args, utils::init_env_logger};

fn main() {
    let args = Args::from_args();
    init_env_logger(args.verbose);

    match export::run(&args.table, &args.output_dir) {
        Ok(summary) => {
            info!(
                "Exported {} attachment{} to `{}`",
                summary.files_written,
                if summary.files_written == 1 { "" } else { "s" },
                args.output_dir,
            );
        }
        Err(error) => {
            error!("{error}");
            let mut cause = error.source();
            while let Some(underlying) = cause {
                error!(" |- {underlying}");
                cause = underlying.source();
            }

            process::exit(1);
        }
    }
}
