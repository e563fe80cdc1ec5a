//! Two-phase logging bootstrap via tracing-subscriber.
//!
//! Phase 1 ([`Logger::bootstrap`]) installs the global subscriber before the
//! full configuration graph exists: an asynchronous console sink gated by a
//! shared [`LevelSwitch`]. Phase 2 ([`Logger::finalize`]) swaps in a sink
//! built from the complete configuration through a reload handle, keeping
//! the same switch instance so a runtime level change affects both phases
//! without re-initialisation.
//!
//! Hold the returned [`Logger`] for the life of the process: dropping it
//! drains the async sink, so buffered lines survive every exit path.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tracing::{Metadata, level_filters::LevelFilter};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    Registry,
    filter::Filtered,
    fmt,
    fmt::format::{DefaultFields, Format, Full},
    layer::{Context, Filter, Layer as _, SubscriberExt},
    reload,
    util::SubscriberInitExt,
};

use crate::{error::AppError, settings::LogSettings};

/// Shared, mutable minimum-severity cell.
///
/// Cloning shares the underlying cell; every console sink holds a clone and
/// consults the current value on each emission, never a snapshot taken at
/// construction time. Setting any supported severity always succeeds.
#[derive(Debug, Clone)]
pub struct LevelSwitch {
    level: Arc<AtomicUsize>,
}

impl LevelSwitch {
    pub fn new(initial: LevelFilter) -> Self {
        Self {
            level: Arc::new(AtomicUsize::new(encode(initial))),
        }
    }

    pub fn set(&self, level: LevelFilter) {
        self.level.store(encode(level), Ordering::Relaxed);
    }

    pub fn get(&self) -> LevelFilter {
        decode(self.level.load(Ordering::Relaxed))
    }
}

// More verbose levels encode higher, matching tracing's level ordering.
fn encode(level: LevelFilter) -> usize {
    if level == LevelFilter::OFF {
        0
    } else if level == LevelFilter::ERROR {
        1
    } else if level == LevelFilter::WARN {
        2
    } else if level == LevelFilter::INFO {
        3
    } else if level == LevelFilter::DEBUG {
        4
    } else {
        5
    }
}

fn decode(value: usize) -> LevelFilter {
    match value {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

impl<S> Filter<S> for LevelSwitch {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        self.get() >= *meta.level()
    }

    // No static ceiling: the switch can be raised at any time, so events
    // must reach the filter rather than being dropped by the max-level hint.
    fn max_level_hint(&self) -> Option<LevelFilter> {
        None
    }
}

type ConsoleLayer =
    Filtered<fmt::Layer<Registry, DefaultFields, Format<Full>, NonBlocking>, LevelSwitch, Registry>;

/// Handle on the installed logging pipeline.
#[derive(Debug)]
pub struct Logger {
    handle: reload::Handle<ConsoleLayer, Registry>,
    switch: LevelSwitch,
    // Draining the bootstrap writer before this is replaced would lose
    // buffered lines; see `finalize`.
    guard: WorkerGuard,
}

impl Logger {
    /// Install the global subscriber with the bootstrap console sink.
    ///
    /// Fails if a subscriber is already installed for this process.
    pub fn bootstrap(settings: &LogSettings) -> Result<Logger, AppError> {
        let switch = LevelSwitch::new(settings.min_level);
        let (layer, guard) = console_layer(&switch);
        let (layer, handle) = reload::Layer::new(layer);

        tracing_subscriber::registry()
            .with(layer)
            .try_init()
            .map_err(|e| AppError::Logger(format!("failed to install subscriber: {e}")))?;

        Ok(Logger {
            handle,
            switch,
            guard,
        })
    }

    /// Replace the bootstrap sink with one built from the full configuration.
    ///
    /// The same [`LevelSwitch`] instance carries over; only the sink is
    /// rebuilt. The bootstrap writer's guard is dropped after the swap, so
    /// anything it buffered drains before the old sink goes away.
    pub fn finalize(&mut self, settings: &LogSettings) -> Result<(), AppError> {
        self.switch.set(settings.min_level);
        let (layer, guard) = console_layer(&self.switch);
        self.handle
            .reload(layer)
            .map_err(|e| AppError::Logger(format!("failed to swap console sink: {e}")))?;
        self.guard = guard;
        Ok(())
    }

    /// The shared severity cell gating console output.
    pub fn level_switch(&self) -> &LevelSwitch {
        &self.switch
    }
}

fn console_layer(switch: &LevelSwitch) -> (ConsoleLayer, WorkerGuard) {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_filter(switch.clone());
    (layer, guard)
}

/// Parse a log level string into a [`LevelFilter`], rejecting unrecognised
/// values. Used to validate configuration before it reaches the switch.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}
