//! # Loaders: the collaborator side of a load.
//!
//! This module provides the contract the scheduler depends on and two
//! implementations of it:
//! - [`Loader`]: starts one load, reports through [`LoadSignals`]
//! - [`LoadRequest`]: id, settings and cancellation token for one load
//! - [`LoaderFn`]: wraps an async closure
//! - [`FsLoader`]: reads resources from a directory

mod fs;
mod loader;
mod loader_fn;

pub use fs::{FsLoader, LoadedResource};
pub(crate) use loader::Signal;
pub use loader::{LoadRequest, LoadSignals, Loader};
pub use loader_fn::LoaderFn;
