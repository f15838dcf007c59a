use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

use nkpi_cli::input::trace_dropped_values;
use nkpi_cli::logging::{
    LogConfig, LogFormat, REDACTED_VALUE, init_logging_with_writer, redact_value,
};
use nkpi_model::{DropReason, Dropped, RawTable};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn dropped_cell_values_are_redacted_by_default() {
    let captured = Captured::default();
    let mut config = LogConfig::default()
        .with_level_filter(LevelFilter::TRACE)
        .with_format(LogFormat::Json)
        .with_log_data(false);
    config.use_env_filter = false;
    init_logging_with_writer(&config, captured.clone());

    assert_eq!(redact_value("secret"), REDACTED_VALUE);

    let table = RawTable::from_records(
        vec!["Month-Year".to_string(), "Revenue".to_string()],
        vec![vec!["Jan 2024", "acme-internal-figure"]],
    );
    trace_dropped_values(
        &table,
        &[Dropped::cell(0, "Revenue", DropReason::NonNumeric)],
    );

    let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(logs.contains("dropped cell"), "{logs}");
    assert!(logs.contains(REDACTED_VALUE), "{logs}");
    assert!(!logs.contains("acme-internal-figure"), "{logs}");
}
