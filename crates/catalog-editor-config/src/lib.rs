use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config file at {config_path}: {message}")]
    ConfigInvalid {
        config_path: PathBuf,
        message: String,
    },
}

/// A dropdown entry: label shown to the user and the css value applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontOption {
    pub label: String,
    pub value: String,
}

impl FontOption {
    fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub default_family: String,
    pub default_size: String,
    pub families: Vec<FontOption>,
    pub sizes: Vec<FontOption>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            default_family: "Arial".to_string(),
            default_size: "16px".to_string(),
            families: vec![
                FontOption::new("Default (Arial)", "Arial"),
                FontOption::new("Courier New", "Courier New"),
                FontOption::new("Georgia", "Georgia"),
                FontOption::new("Times New Roman", "Times New Roman"),
            ],
            sizes: vec![
                FontOption::new("Small (12px)", "12px"),
                FontOption::new("Normal (16px)", "16px"),
                FontOption::new("Large (20px)", "20px"),
                FontOption::new("Huge (24px)", "24px"),
            ],
        }
    }
}

/// CSS classes put on formatted text in the generated markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub bold: Option<String>,
    pub italic: Option<String>,
    pub underline: Option<String>,
    pub strikethrough: Option<String>,
    pub code: Option<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            bold: Some("font-bold".to_string()),
            italic: Some("italic".to_string()),
            underline: Some("underline".to_string()),
            strikethrough: None,
            code: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Mark new links `nofollow`
    pub no_follow: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub namespace: String,
    /// Undo levels kept (0 = unlimited)
    pub history_depth: usize,
    /// File the generated markup is written to
    pub output_path: Option<PathBuf>,
    pub fonts: FontConfig,
    pub theme: ThemeConfig,
    pub links: LinkConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: "GameDescriptionEditor".to_string(),
            history_depth: 100,
            output_path: None,
            fonts: FontConfig::default(),
            theme: ThemeConfig::default(),
            links: LinkConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config
            .validate()
            .map_err(|message| ConfigError::ConfigInvalid {
                config_path: config_path.to_path_buf(),
                message,
            })?;

        // Expand shell variables and tilde in the output path
        config.output_path = config
            .output_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    /// Load the user config, falling back to defaults when there is none
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        Ok(Self::load_from_path(&config_path)?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/catalog-editor");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn validate(&self) -> Result<(), String> {
        let fonts = &self.fonts;
        if !fonts.sizes.is_empty() && !fonts.sizes.iter().any(|o| o.value == fonts.default_size) {
            return Err(format!(
                "default font size {:?} is not one of the configured sizes",
                fonts.default_size
            ));
        }
        if !fonts.families.is_empty()
            && !fonts.families.iter().any(|o| o.value == fonts.default_family)
        {
            return Err(format!(
                "default font family {:?} is not one of the configured families",
                fonts.default_family
            ));
        }
        Ok(())
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
