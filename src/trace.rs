//! Tracing hooks that vanish when the `tracing` feature is off.
//!
//! Spans: `decode` (fields `elements`, `classes`, plus `parallel` on the
//! rayon path), `suppress` (`candidates`) and `post_process` (`parallel`),
//! which encloses the other two when [`crate::PostProcessor`] drives them.
//! Events: `decoded_candidates` (`count`) and `suppressed` (`kept`,
//! `dropped`). Without the feature both macros expand to no-ops.

/// Opens an info-level span named after the stage: `decode`, `suppress` or
/// `post_process`.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emits an info-level event with box counts at the end of a stage.
///
/// With tracing disabled the counts are still evaluated and then dropped.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Guard returned by `trace_span!` for `decode`, `suppress` and
/// `post_process` when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns self, mirroring `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
