use colored::{ColoredString, Colorize};
use env_logger::Builder as LogBuilder;
use log::{Level as LogLevel, LevelFilter as LogLevelFilter};
use once_cell::sync::Lazy;
use std::{env, io::Write, ops::Deref};

static LOG_PREFIX_DEBUG: Lazy<ColoredString> = Lazy::new(|| "D".normal());
static LOG_PREFIX_INFO: Lazy<ColoredString> = Lazy::new(|| "I".green());
static LOG_PREFIX_WARN: Lazy<ColoredString> = Lazy::new(|| "W".yellow().bold());
static LOG_PREFIX_ERROR: Lazy<ColoredString> = Lazy::new(|| "E".red().bold());
static LOG_PREFIX_TRACE: Lazy<ColoredString> = Lazy::new(|| "T".normal());

pub fn init_env_logger(verbose: bool) {
    let mut builder = LogBuilder::new();
    builder
        .format(|formatter, record| {
            let prefix = match record.level() {
                LogLevel::Debug => LOG_PREFIX_DEBUG.deref(),
                LogLevel::Info => LOG_PREFIX_INFO.deref(),
                LogLevel::Warn => LOG_PREFIX_WARN.deref(),
                LogLevel::Error => LOG_PREFIX_ERROR.deref(),
                LogLevel::Trace => LOG_PREFIX_TRACE.deref(),
            };
            writeln!(formatter, "{} {}", prefix, record.args())
        })
        .filter(
            None,
            if verbose {
                LogLevelFilter::Debug
            } else {
                LogLevelFilter::Info
            },
        );

    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.init();
}
