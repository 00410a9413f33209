//! Process-wide configuration
//!
//! Holds the [`Localizer`] used by [`CastResult::errors`](crate::CastResult::errors).
//! Until [`install`] is called the built-in English [`Catalog`] is used.
//!
//! ```rust,ignore
//! use nebula_caster::config::{self, Config};
//! use nebula_caster::i18n::Catalog;
//!
//! let catalog = Catalog::builtin().merged(Catalog::from_json(include_str!("de.json"))?);
//! config::install(Config::new(catalog));
//! ```

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::i18n::{Catalog, Localizer};

/// Library-wide settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub localizer: Arc<dyn Localizer>,
}

impl Config {
    pub fn new(localizer: impl Localizer + 'static) -> Self {
        Self {
            localizer: Arc::new(localizer),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

static CONFIG: RwLock<Option<Config>> = parking_lot::const_rwlock(None);

static BUILTIN: LazyLock<Arc<dyn Localizer>> = LazyLock::new(|| Arc::new(Catalog::builtin()));

/// Replaces the process-wide configuration.
pub fn install(config: Config) {
    tracing::debug!("installing caster config");
    *CONFIG.write() = Some(config);
}

/// Restores the default configuration.
pub fn reset() {
    tracing::debug!("resetting caster config");
    *CONFIG.write() = None;
}

/// The configuration currently in effect.
pub fn current() -> Config {
    CONFIG.read().clone().unwrap_or_else(|| Config {
        localizer: Arc::clone(&BUILTIN),
    })
}

/// The localizer currently in effect.
pub fn localizer() -> Arc<dyn Localizer> {
    match &*CONFIG.read() {
        Some(config) => Arc::clone(&config.localizer),
        None => Arc::clone(&BUILTIN),
    }
}
