//! Search instrumentation behind the `tracing` feature.
//!
//! Every span and event carries `key = value` fields. Without the feature the
//! fields are still evaluated, so call sites compile the same way either way.

#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:literal, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info_span!($name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:literal, $($key:ident = $value:expr),+ $(,)?) => {{
        let _ = ($($value,)+);
        $crate::trace::Untraced
    }};
}

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:literal, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:literal, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Span guard used when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub(crate) struct Untraced;

#[cfg(not(feature = "tracing"))]
impl Untraced {
    #[inline]
    pub(crate) fn entered(self) -> Self {
        self
    }
}
