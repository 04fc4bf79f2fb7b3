use crate::models::Config;
use crate::util::is_loopback;

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

/// Non-fatal findings collected while loading.
#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

/// Checks a composed config for settings that work but are risky.
pub fn review(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    let api = &config.api.base_url;
    if api.scheme() == "http" && !is_loopback(api) {
        warnings.push_with_hint(
            format!(
                "API base URL {api} uses plain http; session tokens are sent unencrypted"
            ),
            "Point MARQUEE_API_URL at an https endpoint",
        );
    }

    warnings
}
