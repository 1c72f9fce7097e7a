//! Logger initialization for the server

use jiff::{Zoned, tz::TimeZone};
use logforth::{
    append::{FastraceEvent, Stderr},
    filter::EnvFilter,
    layout::Layout,
};
use std::{fmt::Write, io::IsTerminal, str::FromStr, sync::Once};

static INIT: Once = Once::new();

/// Layout writing UTC timestamps, the level and the message, plus any key-values
/// attached to the record.
#[derive(Debug)]
struct UtcLayout {
    no_color: bool,
}

impl UtcLayout {
    fn new() -> Self {
        Self { no_color: false }
    }

    fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    fn level(&self, level: log::Level) -> String {
        if self.no_color {
            return format!("{level:>5}");
        }

        let color = match level {
            log::Level::Error => 31,
            log::Level::Warn => 33,
            log::Level::Info => 32,
            log::Level::Debug => 34,
            log::Level::Trace => 35,
        };

        format!("\x1b[{color}m{level:>5}\x1b[0m")
    }
}

impl Layout for UtcLayout {
    fn format(
        &self,
        record: &log::Record<'_>,
        _diagnostics: &[Box<dyn logforth::diagnostic::Diagnostic>],
    ) -> anyhow::Result<Vec<u8>> {
        let mut output = String::new();

        let now = Zoned::now().with_time_zone(TimeZone::UTC);
        write!(output, "{} ", now.strftime("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        write!(output, "{}  {}", self.level(record.level()), record.args())?;

        let mut visitor = KeyValueWriter { output: &mut output };
        record
            .key_values()
            .visit(&mut visitor)
            .map_err(|e| anyhow::anyhow!("{e}"))?;

        Ok(output.into_bytes())
    }
}

struct KeyValueWriter<'a> {
    output: &'a mut String,
}

impl<'kvs> log::kv::VisitSource<'kvs> for KeyValueWriter<'_> {
    fn visit_pair(&mut self, key: log::kv::Key<'kvs>, value: log::kv::Value<'kvs>) -> Result<(), log::kv::Error> {
        write!(self.output, " {key}={value}").map_err(|_| log::kv::Error::msg("failed to format key-value"))
    }
}

/// Initialize the logger. Only the first call has an effect.
///
/// The log_filter should be a string like "info" or "server=debug,quota=debug"
pub fn init(log_filter: &str) {
    let log_filter = log_filter.to_owned();
    INIT.call_once(move || apply_logger(log_filter));
}

fn env_filter(log_filter: &str) -> EnvFilter {
    EnvFilter::from_str(log_filter).unwrap_or_else(|_| EnvFilter::from_str("info").expect("default filter should be valid"))
}

fn apply_logger(log_filter: String) {
    let filter_for_fastrace = log_filter.clone();

    logforth::builder()
        // Attaches log records as events to the active request span.
        .dispatch(move |d| d.filter(env_filter(&filter_for_fastrace)).append(FastraceEvent::default()))
        .dispatch(move |d| {
            let layout = if std::io::stderr().is_terminal() {
                UtcLayout::new()
            } else {
                UtcLayout::new().no_color()
            };

            d.filter(env_filter(&log_filter)).append(Stderr::default().with_layout(layout))
        })
        .apply();
}
