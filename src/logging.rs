// Logging handle: a tracing dispatcher that is built once in `main` and
// handed to the dispatcher and the API client. It is never installed as the
// global default, callers enter it with `Logger::scope`.

use std::fmt;
use std::io;

use tracing::{dispatcher, Dispatch};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::MakeWriter;

/// Cheap to clone; clones share the same subscriber.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Log to stderr at INFO, or DEBUG when `debug` is set.
    pub fn new(debug: bool) -> Self {
        Self::with_writer(debug, io::stderr)
    }

    pub fn with_writer<W>(debug: bool, writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let level = if debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };
        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer)
            .with_max_level(level)
            .with_timer(TimeAndPid)
            .with_ansi(false)
            .with_target(false)
            .with_level(false)
            .finish();
        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// A handle that drops every event.
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Run `f` with this handle as the current dispatcher.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }
}

/// `<timestamp> [<pid>]` prefix for every line.
struct TimeAndPid;

impl FormatTime for TimeAndPid {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        SystemTime.format_time(w)?;
        write!(w, " [{}]", std::process::id())
    }
}
