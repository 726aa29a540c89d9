//! Config records (read-only, загружаются снаружи один раз).
//!
//! - weapon: WeaponConfig + вложенный ExplosionConfig
//! - actor: ActorConfig, AIConfig
//! - loader: ConfigLibrary (TOML → Arc templates)

use std::path::PathBuf;

use thiserror::Error;

pub mod actor;
pub mod loader;
pub mod weapon;

pub use actor::{AIConfig, ActorConfig};
pub use loader::ConfigLibrary;
pub use weapon::{ExplosionConfig, OriginCycleMode, ScatterType, WeaponConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {kind} config '{name}': {reason}")]
    Invalid {
        kind: &'static str,
        name: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(kind: &'static str, name: &str, reason: &str) -> Self {
        Self::Invalid {
            kind,
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Проставляет имя шаблона (валидация самих записей имени не знает)
    pub fn named(self, template: &str) -> Self {
        match self {
            Self::Invalid { kind, reason, .. } => Self::Invalid {
                kind,
                name: template.to_string(),
                reason,
            },
            other => other,
        }
    }
}
