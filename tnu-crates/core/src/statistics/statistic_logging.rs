//! Writes statistics as `PREFIX name=value` lines to a globally configured writer.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// How statistics are written: the prefix of every line, an optional closing line after a block
/// of statistics and an optional casing of the names.
pub struct StatisticOptions {
    prefix: String,
    closing_line: Option<String>,
    casing: Option<Case>,
    writer: Box<dyn Write + Send>,
}

impl StatisticOptions {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            closing_line: None,
            casing: None,
            writer: Box::new(stdout()),
        }
    }

    pub fn with_closing_line(mut self, closing_line: impl Into<String>) -> Self {
        self.closing_line = Some(closing_line.into());
        self
    }

    pub fn with_casing(mut self, casing: Case) -> Self {
        self.casing = Some(casing);
        self
    }

    pub fn with_writer(mut self, writer: Box<dyn Write + Send>) -> Self {
        self.writer = writer;
        self
    }

    fn write_line(&mut self, name: String, value: impl Display) {
        let name = match self.casing {
            Some(casing) => name.to_case(casing),
            None => name,
        };
        let _ = writeln!(self.writer, "{} {name}={value}", self.prefix);
    }
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("closing_line", &self.closing_line)
            .field("casing", &self.casing)
            .field("writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<Mutex<StatisticOptions>> = OnceLock::new();

/// Configures the logging of the statistics.
///
/// Only the first call has an effect; nothing is written before this function has been called.
pub fn configure_statistic_logging(options: StatisticOptions) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| Mutex::new(options));
}

/// Logs the statistic `name` with `value`.
pub fn log_statistic(name: impl Display, value: impl Display) {
    if let Some(Ok(mut options)) = STATISTIC_OPTIONS.get().map(Mutex::lock) {
        options.write_line(name.to_string(), value);
    }
}

/// Logs the configured closing line, if there is one.
pub fn log_statistic_postfix() {
    if let Some(Ok(mut options)) = STATISTIC_OPTIONS.get().map(Mutex::lock) {
        if let Some(closing_line) = options.closing_line.clone() {
            let _ = writeln!(options.writer, "{closing_line}");
        }
    }
}

/// Whether [`configure_statistic_logging`] has been called.
pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::Mutex;

    use convert_case::Case;

    use super::StatisticOptions;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn names_are_cased_and_prefixed() {
        let buffer = SharedBuffer::default();
        let mut options = StatisticOptions::new("%%stats")
            .with_casing(Case::Camel)
            .with_writer(Box::new(buffer.clone()));

        options.write_line("rule_applications".to_owned(), 12);

        let written = String::from_utf8(buffer.0.lock().expect("buffer lock").clone())
            .expect("valid utf-8");
        assert_eq!(written, "%%stats ruleApplications=12\n");
    }
}
