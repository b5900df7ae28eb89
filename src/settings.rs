use std::{fmt, path::PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de, Deserialize, Deserializer, Serialize};

pub const SETTINGS_FILE: &str = "AutoMerge.toml";
pub const ENV_PREFIX: &str = "AUTOMERGE_";

/// Settings of the tool itself, as opposed to the front-end [`AppConfig`](crate::AppConfig).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where merge schedules are persisted
    pub schedule_file: PathBuf,

    /// Repository the schedules refer to. Recorded only.
    pub repo_path: Option<PathBuf>,

    /// `tracing_subscriber` filter directive, overridden by `RUST_LOG`
    #[serde(deserialize_with = "scalar_as_string")]
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schedule_file: PathBuf::from("merge_configs.json"),
            repo_path: None,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    /// Layers, lowest priority first: defaults, `AutoMerge.toml`, `GIT_REPO_PATH`,
    /// `AUTOMERGE_*` variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(SETTINGS_FILE))
            .merge(
                Env::raw()
                    .only(&["GIT_REPO_PATH"])
                    .map(|_| "repo_path".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract from [`Settings::figment`]. An empty repository path counts as unset.
    pub fn load() -> Result<Self, figment::Error> {
        let mut settings: Self = Self::figment().extract()?;
        settings.repo_path = settings
            .repo_path
            .filter(|path| !path.as_os_str().is_empty());
        Ok(settings)
    }
}

/// Environment values are parsed, so `AUTOMERGE_LOG_FILTER=42` arrives as a number.
fn scalar_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct ScalarVisitor;

    impl de::Visitor<'_> for ScalarVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or scalar")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_char<E: de::Error>(self, v: char) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}
