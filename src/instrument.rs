//! Instrumentation: scoped duration measurement and function wrapping.
//!
//! Every entry point resolves a run id the same way: an explicit value wins,
//! then the bound logger's context, then a freshly generated identifier —
//! so every timing and count event carries a run id even when emitted
//! outside any configured context.
//!
//! Duration measurement is a scope guard: elapsed time is emitted on drop,
//! which runs on both the success path and unwind, so duration events are
//! never lost to a panic inside the guarded block (the panic itself
//! propagates untouched). The wrapping forms are higher-order functions that
//! take a function and return an instrumented function of the same
//! signature.

use std::time::Instant;

use crate::context;
use crate::logger::Logger;
use crate::severity::Severity;

pub const DURATION_EVENT: &str = "duration";
pub const RETURN_COUNT_EVENT: &str = "return_count";

/// Resolve the run id for an instrumentation event:
/// explicit > bound logger context > freshly generated.
fn resolve_run_id(logger: &Logger, explicit: Option<&str>) -> String {
    if let Some(id) = explicit {
        return id.to_string();
    }
    if let Some(id) = logger.run_id() {
        return id.to_string();
    }
    context::generate_run_id()
}

/// Guard that emits a `duration` event when dropped.
pub struct ScopedDuration<'a> {
    logger: &'a Logger,
    name: String,
    run_id: String,
    function: Option<String>,
    start: Instant,
}

impl<'a> ScopedDuration<'a> {
    fn new(logger: &'a Logger, name: &str, run_id: Option<&str>) -> Self {
        Self {
            logger,
            name: name.to_string(),
            run_id: resolve_run_id(logger, run_id),
            function: None,
            start: Instant::now(),
        }
    }

    /// Pin the run id carried by the emitted event.
    pub fn with_run_id(mut self, run_id: &str) -> Self {
        self.run_id = run_id.to_string();
        self
    }

    fn with_function(mut self, function: &str) -> Self {
        self.function = Some(function.to_string());
        self
    }

    /// Milliseconds elapsed so far.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedDuration<'_> {
    fn drop(&mut self) {
        let mut event = self
            .logger
            .event(Severity::Info, DURATION_EVENT)
            .kind(DURATION_EVENT)
            .run_id(&self.run_id)
            .field("duration_name", &self.name)
            .field("elapsed_ms", self.elapsed_ms())
            .field("unit", "ms");
        if let Some(function) = &self.function {
            event = event.function(function);
        }
        event.emit();
    }
}

/// Measure elapsed time for a block and emit it on scope exit.
///
/// ```
/// # let logger = runlog::get_logger("demo", None, None);
/// {
///     let _timer = runlog::time_scope(&logger, "load_index");
///     // guarded work
/// } // duration event emitted here, success or panic
/// ```
pub fn time_scope<'a>(logger: &'a Logger, name: &str) -> ScopedDuration<'a> {
    ScopedDuration::new(logger, name, None)
}

/// Wrap a function so every invocation emits a `duration` event.
///
/// The default name is the wrapped function's fully qualified type name.
pub fn wrap_duration<A, R, F>(
    logger: Logger,
    name: Option<&str>,
    run_id: Option<&str>,
    f: F,
) -> impl Fn(A) -> R
where
    F: Fn(A) -> R,
{
    let name = name
        .map(str::to_string)
        .unwrap_or_else(|| std::any::type_name::<F>().to_string());
    let run_id = run_id.map(str::to_string);

    move |arg| {
        let _guard = ScopedDuration::new(&logger, &name, run_id.as_deref())
            .with_function(&name);
        f(arg)
    }
}

/// Wrap a function so every invocation emits a `return_count` event.
///
/// The wrapped call's return value is passed through unchanged; the count is
/// observed via [`ReturnCount`], which never consumes the result.
pub fn wrap_return_count<A, R, F>(
    logger: Logger,
    name: Option<&str>,
    run_id: Option<&str>,
    f: F,
) -> impl Fn(A) -> R
where
    R: ReturnCount,
    F: Fn(A) -> R,
{
    let name = name
        .map(str::to_string)
        .unwrap_or_else(|| std::any::type_name::<F>().to_string());
    let run_id = run_id.map(str::to_string);

    move |arg| {
        let result = f(arg);
        let resolved = resolve_run_id(&logger, run_id.as_deref());
        logger
            .event(Severity::Info, RETURN_COUNT_EVENT)
            .kind(RETURN_COUNT_EVENT)
            .run_id(&resolved)
            .function(&name)
            .field("return_count_name", &name)
            .field("count", result.return_count())
            .emit();
        result
    }
}

/// Result cardinality as observed by [`wrap_return_count`].
///
/// Absent results count 0, collections count their length, scalars count 1.
/// One-shot iterators deliberately have no implementation: counting them
/// would consume the sequence before it reaches the caller, so materialize
/// (collect) first if an accurate count is needed.
pub trait ReturnCount {
    fn return_count(&self) -> u64;
}

impl<T: ReturnCount + ?Sized> ReturnCount for &T {
    fn return_count(&self) -> u64 {
        (**self).return_count()
    }
}

impl<T: ReturnCount> ReturnCount for Option<T> {
    fn return_count(&self) -> u64 {
        self.as_ref().map_or(0, ReturnCount::return_count)
    }
}

impl<T: ReturnCount, E> ReturnCount for Result<T, E> {
    fn return_count(&self) -> u64 {
        self.as_ref().map_or(0, ReturnCount::return_count)
    }
}

impl ReturnCount for () {
    fn return_count(&self) -> u64 {
        0
    }
}

impl<T> ReturnCount for Vec<T> {
    fn return_count(&self) -> u64 {
        self.len() as u64
    }
}

impl<T> ReturnCount for [T] {
    fn return_count(&self) -> u64 {
        self.len() as u64
    }
}

impl<T> ReturnCount for std::collections::VecDeque<T> {
    fn return_count(&self) -> u64 {
        self.len() as u64
    }
}

impl<K, V, S> ReturnCount for std::collections::HashMap<K, V, S> {
    fn return_count(&self) -> u64 {
        self.len() as u64
    }
}

impl<K, V> ReturnCount for std::collections::BTreeMap<K, V> {
    fn return_count(&self) -> u64 {
        self.len() as u64
    }
}

impl<T, S> ReturnCount for std::collections::HashSet<T, S> {
    fn return_count(&self) -> u64 {
        self.len() as u64
    }
}

impl ReturnCount for String {
    fn return_count(&self) -> u64 {
        self.len() as u64
    }
}

impl ReturnCount for str {
    fn return_count(&self) -> u64 {
        self.len() as u64
    }
}

impl ReturnCount for serde_json::Value {
    fn return_count(&self) -> u64 {
        match self {
            serde_json::Value::Null => 0,
            serde_json::Value::Array(items) => items.len() as u64,
            serde_json::Value::Object(map) => map.len() as u64,
            serde_json::Value::String(s) => s.len() as u64,
            _ => 1,
        }
    }
}

macro_rules! scalar_return_count {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ReturnCount for $ty {
                fn return_count(&self) -> u64 {
                    1
                }
            }
        )*
    };
}

scalar_return_count!(bool, char, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);
