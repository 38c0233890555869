use card_codec::{EncodeOptions, UrlOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// When a commit that changes the URL should replace the current history
/// entry instead of pushing a new one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplacePolicy {
    /// Same card content and same editor mode: typically a new card that just
    /// received its first saved id.
    #[default]
    SameCardSameMode,
    /// Same card content, regardless of mode.
    SameCard,
    AlwaysPush,
}

impl ReplacePolicy {
    pub fn should_replace(self, same_card: bool, same_mode: bool) -> bool {
        match self {
            ReplacePolicy::SameCardSameMode => same_card && same_mode,
            ReplacePolicy::SameCard => same_card,
            ReplacePolicy::AlwaysPush => false,
        }
    }
}

/// What a pop does after resolving the focused row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusPopPolicy {
    /// Keep reconciling the document and mode.
    #[default]
    Continue,
    /// A pop that had a focused row only moves or clears the focus.
    Terminal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub base_path: String,
    pub include_slug: bool,
    pub preserve_query_params: bool,
    pub max_token_bytes: Option<usize>,
    pub replace_policy: ReplacePolicy,
    pub focus_pop: FocusPopPolicy,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            base_path: "/question".to_string(),
            include_slug: true,
            preserve_query_params: true,
            max_token_bytes: None,
            replace_policy: ReplacePolicy::default(),
            focus_pop: FocusPopPolicy::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid navigation config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("base_path must start with '/', got '{0}'")]
    BasePath(String),

    #[error("max_token_bytes must be positive")]
    TokenLimit,
}

impl NavConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: NavConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_path.starts_with('/') {
            return Err(ConfigError::BasePath(self.base_path.clone()));
        }
        if self.max_token_bytes == Some(0) {
            return Err(ConfigError::TokenLimit);
        }
        Ok(())
    }

    pub fn url_options(&self) -> UrlOptions {
        UrlOptions {
            base_path: self.base_path.clone(),
            include_slug: self.include_slug,
            encode: EncodeOptions {
                max_token_bytes: self.max_token_bytes,
            },
        }
    }
}
