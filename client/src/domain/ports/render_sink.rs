//! Port through which list changes reach the presentation layer.

use crate::domain::{EditScript, Product};

/// Receives edit scripts for the rendered product list.
///
/// Calls arrive from the feed's owning task, one at a time, in the order the
/// changes happened.
#[cfg_attr(test, mockall::automock)]
pub trait RenderSink: Send {
    /// Replace the whole visible list; used for first population.
    fn reset(&mut self, items: &[Product]);

    /// Apply an incremental change set.
    fn apply(&mut self, script: &EditScript<Product>);

    /// Show or hide the trailing loading indicator.
    fn set_loading(&mut self, loading: bool);
}

/// Sink that drops every update, for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderSink;

impl RenderSink for NullRenderSink {
    fn reset(&mut self, _items: &[Product]) {}

    fn apply(&mut self, _script: &EditScript<Product>) {}

    fn set_loading(&mut self, _loading: bool) {}
}
