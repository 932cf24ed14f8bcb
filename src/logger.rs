//! Dual-sink event routing and context-bound loggers.
//!
//! A [`Router`] holds the active sink set (overview, detail, optional
//! console), each with an independent minimum severity. At most one router
//! is active per process; reconfiguration replaces the whole set atomically
//! for emits issued after it returns. A [`Logger`] is a lightweight handle
//! bound to a run context; it looks up the active router at emit time, so
//! loggers created before a reconfiguration keep working afterward.

use std::panic::Location;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use crate::context;
use crate::event::StructuredEvent;
use crate::format;
use crate::severity::Severity;
use crate::sink::{ConsoleSink, Sink};

/// The active sink set: overview, detail, and optional console.
pub struct Router {
    pub(crate) overview: Sink,
    pub(crate) detail: Sink,
    pub(crate) console: Option<ConsoleSink>,
}

impl Router {
    pub fn new(overview: Sink, detail: Sink, console: Option<ConsoleSink>) -> Self {
        Self {
            overview,
            detail,
            console,
        }
    }

    /// Route one event to every sink whose threshold it passes.
    ///
    /// Overview and console receive the human rendering, detail the JSON
    /// rendering. Formatting happens at most once per representation.
    pub fn dispatch(&self, event: &StructuredEvent) {
        let wants_overview = self.overview.accepts(event.level);
        let wants_console = self
            .console
            .as_ref()
            .is_some_and(|c| c.accepts(event.level));

        if wants_overview || wants_console {
            let line = format::overview_line(event);
            if wants_overview {
                self.overview.append(&line);
            }
            if wants_console {
                if let Some(console) = &self.console {
                    console.append(&line);
                }
            }
        }

        if self.detail.accepts(event.level) {
            self.detail.append(&format::detail_line(event));
        }
    }
}

static ROUTER: RwLock<Option<Arc<Router>>> = RwLock::new(None);

/// Install a new router, replacing any previously configured sink set.
pub(crate) fn install(router: Router) {
    *ROUTER.write() = Some(Arc::new(router));
}

/// The currently active router, if logging has been configured.
pub(crate) fn active_router() -> Option<Arc<Router>> {
    ROUTER.read().clone()
}

/// A named logger bound to a run context.
///
/// Composition over the registry: the context is resolved once at creation
/// (explicit values override the registry's current pair) and injected into
/// every event before dispatch.
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    app: Option<String>,
    run_id: Option<String>,
}

/// Return a logger bound to a context.
///
/// Explicit `app`/`run_id` override the registry's current values; when both
/// are absent the corresponding detail fields are emitted as null rather
/// than failing.
pub fn get_logger(name: &str, app: Option<&str>, run_id: Option<&str>) -> Logger {
    let current = context::current();
    Logger {
        name: name.to_string(),
        app: app
            .map(str::to_string)
            .or_else(|| current.as_ref().map(|c| c.application.clone())),
        run_id: run_id
            .map(str::to_string)
            .or_else(|| current.as_ref().map(|c| c.run_id.clone())),
    }
}

impl Logger {
    /// A logger bound to no context at all.
    ///
    /// Events carry null `app`/`run_id`, and instrumentation falls back to
    /// generated run ids. Useful for code paths that run before (or without)
    /// configuration.
    pub fn detached(name: &str) -> Self {
        Self {
            name: name.to_string(),
            app: None,
            run_id: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The run id this logger is bound to, if any.
    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.event(Severity::Trace, message).emit();
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.event(Severity::Debug, message).emit();
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.event(Severity::Info, message).emit();
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.event(Severity::Warning, message).emit();
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.event(Severity::Error, message).emit();
    }

    /// Start a structured event. Call-site file and line are captured here.
    #[track_caller]
    pub fn event(&self, level: Severity, message: impl Into<String>) -> EventBuilder<'_> {
        let caller = Location::caller();
        EventBuilder {
            logger: self,
            event: StructuredEvent::new(
                level,
                &self.name,
                message.into(),
                self.app.clone(),
                self.run_id.clone(),
                caller.file(),
                caller.line(),
            ),
        }
    }

    pub(crate) fn dispatch(&self, event: StructuredEvent) {
        // No router configured means logging is a no-op, matching the
        // contract that emits never fail the caller.
        if let Some(router) = active_router() {
            router.dispatch(&event);
        }
    }
}

/// Builder for one structured event; [`emit`](EventBuilder::emit) routes it.
pub struct EventBuilder<'a> {
    logger: &'a Logger,
    event: StructuredEvent,
}

impl EventBuilder<'_> {
    /// Tag the event kind (`"duration"`, `"return_count"`, `"object"`, ...).
    pub fn kind(mut self, kind: &str) -> Self {
        self.event.kind = Some(kind.to_string());
        self
    }

    /// Attach one structured field.
    ///
    /// A value that cannot be serialized natively falls back to its debug
    /// string; the event is still emitted, never dropped.
    pub fn field(mut self, key: &str, value: impl Serialize + std::fmt::Debug) -> Self {
        let value = serde_json::to_value(&value)
            .unwrap_or_else(|_| Value::String(format!("{:?}", value)));
        self.event.fields.insert(key.to_string(), value);
        self
    }

    /// Name the emitting function (instrumentation sets this).
    pub fn function(mut self, name: &str) -> Self {
        self.event.function = Some(name.to_string());
        self
    }

    /// Override the run id carried by this event.
    pub fn run_id(mut self, run_id: &str) -> Self {
        self.event.run_id = Some(run_id.to_string());
        self
    }

    /// Attach an error; its display chain becomes the `exception` field.
    pub fn error(mut self, err: &(dyn std::error::Error + 'static)) -> Self {
        let mut trace = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            trace.push_str("\ncaused by: ");
            trace.push_str(&cause.to_string());
            source = cause.source();
        }
        self.event.exception = Some(trace);
        self
    }

    /// Route the event to every active sink that accepts its severity.
    pub fn emit(self) {
        self.logger.dispatch(self.event);
    }
}
