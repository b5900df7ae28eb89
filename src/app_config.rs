use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

/// Environment variable overriding [`PublicRuntimeConfig::api_base`].
pub const API_BASE_VAR: &str = "API_BASE";

/// Used whenever `API_BASE` is unset or empty.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

pub const COMPATIBILITY_DATE: &str = "2025-04-10";

pub const MODULES: [&str; 2] = ["@nuxtjs/tailwindcss", "@pinia/nuxt"];

const TITLE: &str = "Auto Merge Tool";
const DESCRIPTION: &str = "Tự động merge code giữa các nhánh Git";

/// The immutable front-end configuration record.
///
/// Everything except `runtime_config.public.api_base` is a literal, so two records built from
/// environments that agree on `API_BASE` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub devtools: FeatureFlag,
    pub modules: Vec<String>,
    pub runtime_config: RuntimeConfig,
    pub app: AppMeta,
    pub compatibility_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlag {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeConfig {
    pub public: PublicRuntimeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRuntimeConfig {
    pub api_base: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppMeta {
    pub head: DocumentHead,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentHead {
    pub title: String,
    pub meta: Vec<MetaTag>,
}

/// One `<meta>` element as attribute name to value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetaTag(pub BTreeMap<String, String>);

impl MetaTag {
    fn new(attributes: &[(&str, &str)]) -> Self {
        Self(
            attributes
                .iter()
                .map(|&(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        )
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.0.get(attribute).map(String::as_str)
    }
}

impl AppConfig {
    /// Build the record from an environment snapshot. Never fails: a missing or empty
    /// `API_BASE` falls back to [`DEFAULT_API_BASE`], any other value is taken verbatim.
    pub fn load(env: &HashMap<String, String>) -> Self {
        let api_base = match env.get(API_BASE_VAR) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => {
                debug!("{API_BASE_VAR} unset or empty, falling back to {DEFAULT_API_BASE}");
                DEFAULT_API_BASE.to_string()
            }
        };

        Self {
            devtools: FeatureFlag { enabled: true },
            modules: MODULES.iter().map(ToString::to_string).collect(),
            runtime_config: RuntimeConfig {
                public: PublicRuntimeConfig { api_base },
            },
            app: AppMeta {
                head: DocumentHead {
                    title: TITLE.to_string(),
                    meta: vec![
                        MetaTag::new(&[("charset", "utf-8")]),
                        MetaTag::new(&[
                            ("name", "viewport"),
                            ("content", "width=device-width, initial-scale=1"),
                        ]),
                        MetaTag::new(&[
                            ("hid", "description"),
                            ("name", "description"),
                            ("content", DESCRIPTION),
                        ]),
                    ],
                },
            },
            compatibility_date: COMPATIBILITY_DATE.to_string(),
        }
    }

    /// Snapshot the process environment once and build the record from it.
    ///
    /// Variables that are not valid unicode are skipped rather than treated as errors.
    pub fn from_process_env() -> Self {
        let env = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect::<HashMap<String, String>>();

        Self::load(&env)
    }

    pub fn api_base(&self) -> &str {
        &self.runtime_config.public.api_base
    }

    pub fn is_module_enabled(&self, module: &str) -> bool {
        self.modules.iter().any(|m| m == module)
    }

    /// The `content` of the first meta tag whose `name` attribute matches.
    pub fn meta_content(&self, name: &str) -> Option<&str> {
        self.app
            .head
            .meta
            .iter()
            .find(|tag| tag.get("name") == Some(name))
            .and_then(|tag| tag.get("content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::make_env;

    macro_rules! api_base_tests {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (vars, expected) = $value;
                    assert_eq!(expected, AppConfig::load(&make_env(vars)).api_base());
                }
            )*
        }
    }

    api_base_tests! {
        api_base_set: (&[("API_BASE", "https://api.example.com")], "https://api.example.com"),
        api_base_empty_string: (&[("API_BASE", "")], "http://localhost:5000"),
        api_base_not_trimmed: (&[("API_BASE", "  http://x/ ")], "  http://x/ "),
        api_base_other_vars_ignored: (&[("NUXT_API_BASE", "http://other"), ("PATH", "/bin")], "http://localhost:5000"),
    }

    #[test]
    fn api_base_empty_env() {
        let config = AppConfig::load(&HashMap::new());
        assert_eq!(config.api_base(), "http://localhost:5000");
    }

    #[cfg(unix)]
    #[test]
    fn process_env_skips_non_unicode_vars() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        figment::Jail::expect_with(|jail| {
            jail.set_env("API_BASE", "https://api.example.com");
            std::env::set_var("AUTOMERGE_TEST_NOT_UNICODE", OsStr::from_bytes(b"\xff\xfe"));

            let config = AppConfig::from_process_env();
            std::env::remove_var("AUTOMERGE_TEST_NOT_UNICODE");

            assert_eq!(config.api_base(), "https://api.example.com");
            Ok(())
        });
    }

    #[test]
    fn literals_do_not_depend_on_env() {
        let default = AppConfig::load(&HashMap::new());
        let overridden = AppConfig::load(&make_env(&[("API_BASE", "https://api.example.com")]));

        assert_eq!(default.modules, overridden.modules);
        assert_eq!(default.app, overridden.app);
        assert_eq!(default.devtools, overridden.devtools);
        assert_eq!(default.compatibility_date, overridden.compatibility_date);
        assert_ne!(default, overridden);
    }

    #[test]
    fn load_is_idempotent() {
        let env = make_env(&[("API_BASE", "https://api.example.com")]);
        assert_eq!(AppConfig::load(&env), AppConfig::load(&env));
    }

    #[test]
    fn modules_keep_declaration_order() {
        let config = AppConfig::load(&HashMap::new());
        assert_eq!(config.modules, vec!["@nuxtjs/tailwindcss", "@pinia/nuxt"]);
        assert!(config.is_module_enabled("@pinia/nuxt"));
        assert!(!config.is_module_enabled("@nuxt/content"));
        assert!(config.devtools.enabled);
    }

    #[test]
    fn document_head() {
        let config = AppConfig::load(&HashMap::new());
        let head = &config.app.head;

        assert_eq!(head.title, "Auto Merge Tool");
        assert_eq!(head.meta.len(), 3);
        assert_eq!(head.meta[0].get("charset"), Some("utf-8"));
        assert_eq!(
            config.meta_content("viewport"),
            Some("width=device-width, initial-scale=1")
        );
        assert_eq!(
            config.meta_content("description"),
            Some("Tự động merge code giữa các nhánh Git")
        );
        assert_eq!(head.meta[2].get("hid"), Some("description"));
        assert_eq!(config.meta_content("keywords"), None);
    }

    #[test]
    fn serializes_with_camel_case_surface() {
        let config = AppConfig::load(&make_env(&[("API_BASE", "https://api.example.com")]));
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(
            value["runtimeConfig"]["public"]["apiBase"],
            "https://api.example.com"
        );
        assert_eq!(value["compatibilityDate"], "2025-04-10");
        assert_eq!(value["devtools"]["enabled"], true);
        assert_eq!(value["app"]["head"]["meta"][0]["charset"], "utf-8");
        assert_eq!(value["modules"][1], "@pinia/nuxt");
    }
}
