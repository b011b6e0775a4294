use serde::Deserialize;

use vitrine_variants::DEFAULT_DISCONTINUED_MARKER;

/// Runtime switches for the discontinued combinations hook, loaded from an
/// optional config file overlaid with `VITRINE_`-prefixed environment
/// variables
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HookSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_marker")]
    pub discontinued_marker: char,
}

fn default_enabled() -> bool {
    true
}

fn default_marker() -> char {
    DEFAULT_DISCONTINUED_MARKER
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            discontinued_marker: DEFAULT_DISCONTINUED_MARKER,
        }
    }
}

impl HookSettings {
    pub fn load() -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::with_name("config/vitrine").required(false))
            .add_source(config::Environment::with_prefix("VITRINE"))
            .build()?;

        s.try_deserialize()
    }
}
