//! ConfigLibrary: именованные конфиги, загружаемые один раз из TOML.
//!
//! ```toml
//! [weapons.rifle]
//! damage = 25.0
//! projectile_count = 3
//!
//! [weapons.rocket.explosion]
//! radius = 3.0
//!
//! [actors.grunt]
//! max_health = 60.0
//!
//! [ai.grunt]
//! detection_radius = 12.0
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use super::{AIConfig, ActorConfig, ConfigError, WeaponConfig};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLibrary {
    weapons: HashMap<String, WeaponConfig>,
    actors: HashMap<String, ActorConfig>,
    ai: HashMap<String, AIConfig>,
}

/// Read-only библиотека шаблонов (Arc: шаблоны шарятся между entities)
#[derive(Debug, Clone, Default)]
pub struct ConfigLibrary {
    weapons: HashMap<String, Arc<WeaponConfig>>,
    actors: HashMap<String, Arc<ActorConfig>>,
    ai: HashMap<String, Arc<AIConfig>>,
}

impl ConfigLibrary {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawLibrary = toml::from_str(text)?;

        for (name, weapon) in &raw.weapons {
            weapon.validate().map_err(|e| e.named(name))?;
        }
        for (name, actor) in &raw.actors {
            actor.validate().map_err(|e| e.named(name))?;
        }
        for (name, ai) in &raw.ai {
            ai.validate().map_err(|e| e.named(name))?;
        }

        Ok(Self {
            weapons: into_shared(raw.weapons),
            actors: into_shared(raw.actors),
            ai: into_shared(raw.ai),
        })
    }

    pub fn weapon(&self, name: &str) -> Option<Arc<WeaponConfig>> {
        self.weapons.get(name).cloned()
    }

    pub fn actor(&self, name: &str) -> Option<Arc<ActorConfig>> {
        self.actors.get(name).cloned()
    }

    pub fn ai(&self, name: &str) -> Option<Arc<AIConfig>> {
        self.ai.get(name).cloned()
    }

    pub fn weapon_names(&self) -> impl Iterator<Item = &str> {
        self.weapons.keys().map(String::as_str)
    }
}

fn into_shared<T>(map: HashMap<String, T>) -> HashMap<String, Arc<T>> {
    map.into_iter().map(|(k, v)| (k, Arc::new(v))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScatterType;

    const LIBRARY: &str = r#"
        [weapons.shotgun]
        damage = 8.0
        projectile_count = 5
        projectile_cooldown = 0.0
        scatter_type = "Cone"
        scatter_angle = 40.0

        [weapons.rocket]
        damage = 40.0
        speed = 12.0

        [weapons.rocket.explosion]
        radius = 3.0
        clone_damage = true

        [actors.grunt]
        max_health = 60.0

        [ai.grunt]
        detection_radius = 12.0
    "#;

    #[test]
    fn test_parses_named_templates_with_defaults() {
        let library = ConfigLibrary::from_toml_str(LIBRARY).expect("valid library");

        let shotgun = library.weapon("shotgun").expect("shotgun");
        assert_eq!(shotgun.projectile_count, 5);
        assert_eq!(shotgun.scatter_type, ScatterType::Cone);
        assert_eq!(shotgun.burst_count, 1);
        assert_eq!(shotgun.lifetime, 1.0);

        let rocket = library.weapon("rocket").expect("rocket");
        let explosion = rocket.explosion.as_ref().expect("explosion");
        assert_eq!(explosion.radius, 3.0);
        assert!(explosion.clone_damage);
        assert_eq!(explosion.hit_area_lifetime, 0.5);

        assert_eq!(library.actor("grunt").map(|a| a.max_health), Some(60.0));
        assert_eq!(library.ai("grunt").map(|a| a.attack_range), Some(5.0));
        assert!(library.weapon("missing").is_none());
    }

    #[test]
    fn test_invalid_template_reports_name() {
        let err = ConfigLibrary::from_toml_str("[weapons.broken]\nburst_count = 0\n")
            .expect_err("burst_count = 0 is invalid");
        match err {
            ConfigError::Invalid { kind, name, .. } => {
                assert_eq!(kind, "weapon");
                assert_eq!(name, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = ConfigLibrary::from_toml_str("[weapons.bad]\ndamage = \"lots\"\n");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ConfigLibrary::load("/definitely/not/here.toml");
        assert!(matches!(err, Err(ConfigError::Io { .. })));
    }
}
