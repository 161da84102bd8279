//! # Closure-backed observer (`ObserverFn`)
//!
//! [`ObserverFn`] wraps a plain `Fn(&LifecycleEvent)`, for callers that just want
//! a callback.
//!
//! ## Example
//! ```rust
//! use tierload::{LifecycleEvent, ObserverFn};
//!
//! let obs = ObserverFn::arc("print", |ev: &LifecycleEvent| {
//!     println!("{} {}", ev.id, ev.kind);
//! });
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;

use crate::events::LifecycleEvent;

use super::Observe;

/// Function-backed observer.
pub struct ObserverFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ObserverFn<F>
where
    F: Fn(&LifecycleEvent) + Send + Sync + 'static,
{
    /// Creates a new function-backed observer.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the observer and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F> Observe for ObserverFn<F>
where
    F: Fn(&LifecycleEvent) + Send + Sync + 'static,
{
    async fn on_event(&self, event: &LifecycleEvent) {
        (self.f)(event);
    }

    fn name(&self) -> &str {
        &self.name
    }
}
