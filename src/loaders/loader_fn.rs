//! # Function-backed loader (`LoaderFn`)
//!
//! [`LoaderFn`] wraps a closure `F: Fn(LoadRequest) -> Fut`, producing a fresh
//! future per resource. The wrapper does the signalling:
//!
//! ```text
//! load(request, signals)
//!   ├─► signals.started()
//!   └─► tokio::spawn
//!         ├─ Ok(())            → signals.succeeded()
//!         ├─ Err(e)            → signals.failed(reason)
//!         └─ request cancelled → future dropped, nothing sent
//! ```
//!
//! ## Example
//! ```rust
//! use tierload::{LoadError, LoadRequest, LoaderFn};
//!
//! let loader = LoaderFn::arc("echo", |req: LoadRequest| async move {
//!     if req.id.is_empty() {
//!         return Err(LoadError::transport("empty id"));
//!     }
//!     Ok(())
//! });
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::error::LoadError;

use super::loader::{LoadRequest, LoadSignals, Loader};

/// Function-backed loader implementation.
pub struct LoaderFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> LoaderFn<F> {
    /// Creates a new function-backed loader.
    ///
    /// Prefer [`LoaderFn::arc`] when you immediately need a shared handle.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the loader and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Loader for LoaderFn<F>
where
    F: Fn(LoadRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), LoadError>> + Send + 'static,
{
    fn load(&self, request: LoadRequest, signals: LoadSignals) {
        let cancel = request.cancel.clone();
        let fut = (self.f)(request);
        signals.started();

        tokio::spawn(async move {
            tokio::select! {
                res = fut => match res {
                    Ok(()) => signals.succeeded(),
                    Err(LoadError::Transport { reason }) => signals.failed(reason),
                    Err(e) => signals.failed(e.to_string()),
                },
                _ = cancel.cancelled() => {
                    debug!(id = signals.id(), "load cancelled");
                }
            }
        });
    }

    fn name(&self) -> &str {
        &self.name
    }
}
