use std::sync::Arc;

use crate::{
    config::LoaderConfig,
    error::ConfigError,
    loaders::Loader,
    observers::Observe,
    priority::{PriorityIndex, PriorityValue},
    settings::{LoadSettings, SettingsTable},
};

use super::handle::TierLoader;

/// Builder for a [`TierLoader`] with non-default settings or configuration.
///
/// The priority map is validated eagerly; any error is reported by [`build`](Self::build).
pub struct TierLoaderBuilder {
    index: Result<PriorityIndex, ConfigError>,
    loader: Arc<dyn Loader>,
    defaults: LoadSettings,
    overrides: Vec<(String, LoadSettings)>,
    cfg: LoaderConfig,
    observer: Option<Arc<dyn Observe>>,
}

impl TierLoaderBuilder {
    pub(crate) fn new<I, K, V>(map: I, loader: Arc<dyn Loader>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PriorityValue>,
    {
        Self {
            index: PriorityIndex::build(map),
            loader,
            defaults: LoadSettings::default(),
            overrides: Vec::new(),
            cfg: LoaderConfig::default(),
            observer: None,
        }
    }

    /// Sets the settings handed to every resource without an override.
    pub fn with_settings(mut self, settings: LoadSettings) -> Self {
        self.defaults = settings;
        self
    }

    /// Replaces the settings of one resource.
    ///
    /// The override is not merged with the defaults. Setting the same id twice
    /// keeps the last value.
    pub fn with_resource_settings(mut self, id: impl Into<String>, settings: LoadSettings) -> Self {
        self.overrides.push((id.into(), settings));
        self
    }

    /// Sets the loader-wide configuration.
    pub fn with_config(mut self, cfg: LoaderConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Registers the initial observer; same as calling [`TierLoader::lifecycle`].
    pub fn with_observer(mut self, observer: Arc<dyn Observe>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Validates everything and returns the loader.
    ///
    /// ### Errors
    /// - any [`ConfigError`] raised while building the priority index;
    /// - [`ConfigError::UnknownResource`] when an override names an id absent from the map.
    pub fn build(self) -> Result<TierLoader, ConfigError> {
        let index = self.index?;

        let mut table = SettingsTable::new(self.defaults);
        for (id, settings) in self.overrides {
            if !index.contains(&id) {
                return Err(ConfigError::UnknownResource { id });
            }
            table.insert(id, settings);
        }

        let loader = TierLoader::from_parts(index, self.loader, table, self.cfg);
        if let Some(observer) = self.observer {
            loader.lifecycle(observer);
        }
        Ok(loader)
    }
}
