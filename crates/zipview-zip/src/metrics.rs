//! Trace events for view and cursor lifecycle.
//!
//! Compiled to no-ops unless the `tracing` feature is enabled; the binary
//! layer decides where events go.

#[cfg(feature = "tracing")]
pub fn cursor_opened(sources: usize, active_columns: usize, inert_sources: usize) {
    tracing::debug!(sources, active_columns, inert_sources, "zip cursor opened");
}

#[cfg(not(feature = "tracing"))]
pub fn cursor_opened(_sources: usize, _active_columns: usize, _inert_sources: usize) {}

#[cfg(feature = "tracing")]
pub fn cursor_set_requested(requested: usize) {
    tracing::debug!(requested, granted = 1usize, "zip cursor set opened");
}

#[cfg(not(feature = "tracing"))]
pub fn cursor_set_requested(_requested: usize) {}
