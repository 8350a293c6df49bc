use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A provider as stored by the configuration layer.
///
/// Names and URLs are user-editable, so none of these fields is a reliable
/// key on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub settings_config: Option<SettingsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    /// Free-text client config (e.g. a TOML document).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
}

impl ProviderRecord {
    pub fn env(&self) -> Option<&BTreeMap<String, String>> {
        self.settings_config.as_ref()?.env.as_ref()
    }

    pub fn config_text(&self) -> Option<&str> {
        self.settings_config.as_ref()?.config.as_deref()
    }
}
