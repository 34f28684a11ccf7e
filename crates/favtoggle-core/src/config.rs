//! Configuration types and parsing.
//!
//! The Config type is a plain serialization schema. Derived values such as
//! the favorite palette live in [`crate::theme`].

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use toml::Table;

use crate::error::{Error, Result};
use crate::theme::is_valid_hex_color;

/// Embedded default configuration TOML, compiled into the binary.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../../config.toml");

/// Directory name used under XDG config roots.
const CONFIG_DIR_NAME: &str = "favtoggle";

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Path where config was found, if any.
    pub source: Option<PathBuf>,
    /// Whether defaults were used (no config file found).
    pub used_defaults: bool,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Class names the favorite controller looks for and produces.
    pub selectors: SelectorsConfig,

    /// Indicator colors for both states.
    pub colors: ColorsConfig,

    /// Catalog window geometry.
    pub window: WindowConfig,

    /// Products rendered into the catalog page.
    pub catalog: CatalogConfig,
}

impl Config {
    /// Load configuration from the embedded default TOML.
    pub fn from_default_toml() -> Result<Self> {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, merging with embedded defaults.
    ///
    /// Returns an error if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_with_defaults(&content)
    }

    /// Parse a TOML string, deep-merging it over the embedded defaults.
    ///
    /// Tables merge key by key; arrays (like `catalog.products`) are replaced
    /// wholesale by the user's value.
    pub fn load_with_defaults(user_toml: &str) -> Result<Self> {
        let mut base: Table = toml::from_str(DEFAULT_CONFIG_TOML)?;
        let user: Table = toml::from_str(user_toml)?;

        deep_merge_toml(&mut base, user);

        let config: Config = base.try_into()?;
        Ok(config)
    }

    /// Find and load configuration using the XDG lookup chain.
    ///
    /// An explicit path is used strictly: missing or broken files are errors.
    /// Without one, the search paths are tried in order. A file that exists
    /// but fails to load is an error too; defaults are used only when no
    /// file exists at all.
    pub fn find_and_load(explicit_path: Option<&Path>) -> Result<ConfigLoadResult> {
        Self::find_and_load_from(explicit_path, &Self::config_search_paths())
    }

    /// [`Config::find_and_load`] over a caller-provided search list.
    pub fn find_and_load_from(
        explicit_path: Option<&Path>,
        search_paths: &[PathBuf],
    ) -> Result<ConfigLoadResult> {
        if let Some(path) = explicit_path {
            let config = Self::load(path)?;
            return Ok(ConfigLoadResult {
                config,
                source: Some(path.to_path_buf()),
                used_defaults: false,
            });
        }

        for path in search_paths {
            if !path.exists() {
                continue;
            }
            match Self::load(path) {
                Ok(config) => {
                    return Ok(ConfigLoadResult {
                        config,
                        source: Some(path.clone()),
                        used_defaults: false,
                    });
                }
                Err(e) => {
                    tracing::error!("Config file {:?} exists but failed to load: {}", path, e);
                    return Err(e);
                }
            }
        }

        tracing::info!("No config file found, using built-in default config");
        tracing::debug!(
            "Searched: {}",
            search_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(ConfigLoadResult {
            config: Self::from_default_toml()?,
            source: None,
            used_defaults: true,
        })
    }

    /// Get the list of paths to search for config files.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(
                PathBuf::from(xdg_config)
                    .join(CONFIG_DIR_NAME)
                    .join("config.toml"),
            );
        }

        if let Ok(home) = env::var("HOME") {
            paths.push(
                PathBuf::from(home)
                    .join(".config")
                    .join(CONFIG_DIR_NAME)
                    .join("config.toml"),
            );
        }

        paths.push(PathBuf::from("config.toml"));

        paths
    }

    /// Validate the configuration, collecting every problem found.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        let classes = [
            ("selectors.icon", &self.selectors.icon),
            ("selectors.indicator", &self.selectors.indicator),
            ("selectors.favorited", &self.selectors.favorited),
        ];
        for (key, value) in classes {
            if !is_valid_class_name(value) {
                errors.push(format!(
                    "{}: invalid class name '{}', expected a bare class like 'favorite-icon'",
                    key, value
                ));
            }
        }
        for (i, (key_a, a)) in classes.iter().enumerate() {
            for (key_b, b) in &classes[i + 1..] {
                if a == b {
                    errors.push(format!("{} and {} must differ (both '{}')", key_a, key_b, a));
                }
            }
        }

        for (key, value) in [
            ("colors.favorited", &self.colors.favorited),
            ("colors.neutral", &self.colors.neutral),
        ] {
            if !is_valid_hex_color(value) {
                errors.push(format!(
                    "{}: invalid value '{}', expected a hex color like '#ff6b6b'",
                    key, value
                ));
            }
        }

        if self.window.width == 0 || self.window.height == 0 {
            errors.push("window.width/window.height: must be greater than 0".to_string());
        }
        if self.window.columns == 0 {
            errors.push("window.columns: must be greater than 0".to_string());
        }

        for (i, product) in self.catalog.products.iter().enumerate() {
            if product.name.trim().is_empty() {
                errors.push(format!("catalog.products[{}].name: must not be empty", i));
            }
            if !product.price.is_finite() || product.price < 0.0 {
                errors.push(format!(
                    "catalog.products[{}].price: invalid value '{}', must be zero or positive",
                    i, product.price
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigValidation(errors))
        }
    }

    /// Human-readable summary of the configuration.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push("Selectors:".to_string());
        lines.push(format!("  icon: .{}", self.selectors.icon));
        lines.push(format!("  indicator: .{}", self.selectors.indicator));
        lines.push(format!("  favorited: .{}", self.selectors.favorited));

        lines.push("\nColors:".to_string());
        lines.push(format!("  favorited: {}", self.colors.favorited));
        lines.push(format!("  neutral: {}", self.colors.neutral));

        lines.push("\nWindow:".to_string());
        lines.push(format!(
            "  {} ({}x{}, {} column(s))",
            self.window.title, self.window.width, self.window.height, self.window.columns
        ));

        lines.push(format!(
            "\nCatalog: {} product(s)",
            self.catalog.products.len()
        ));
        for product in &self.catalog.products {
            let mut line = format!("  - {} ({:.2})", product.name, product.price);
            if product.favorited {
                line.push_str(" [favorited]");
            }
            if !product.heart {
                line.push_str(" [no heart]");
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}

/// A CSS class name usable as a marker: non-empty, no leading dot, and only
/// ASCII letters, digits, `-` or `_`.
fn is_valid_class_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Deep merge two TOML tables, with `overlay` values taking precedence.
///
/// For nested tables, recursively merges. For arrays and other values,
/// the overlay value completely replaces the base value.
fn deep_merge_toml(base: &mut Table, overlay: Table) {
    for (key, overlay_value) in overlay {
        match (base.get_mut(&key), overlay_value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge_toml(base_table, overlay_table);
            }
            (_, overlay_value) => {
                base.insert(key, overlay_value);
            }
        }
    }
}

/// Class names consumed and produced by the favorite controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorsConfig {
    /// Marker class identifying favorite icons.
    pub icon: String,
    /// Class of the optional nested element carrying the color.
    pub indicator: String,
    /// Class toggled on the icon while favorited.
    pub favorited: String,
}

impl Default for SelectorsConfig {
    fn default() -> Self {
        Self {
            icon: "favorite-icon".to_string(),
            indicator: "heart".to_string(),
            favorited: "favorited".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorsConfig {
    /// Highlighted hue applied while favorited.
    pub favorited: String,
    /// Neutral hue applied while not favorited.
    pub neutral: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            favorited: "#ff6b6b".to_string(),
            neutral: "#ccc".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Product cards per grid row.
    pub columns: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Catalog".to_string(),
            width: 720,
            height: 480,
            columns: 2,
        }
    }
}

/// Catalog contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub products: Vec<ProductEntry>,
}

/// One product card in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductEntry {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Whether the icon is rendered already favorited.
    #[serde(default)]
    pub favorited: bool,
    /// Whether the icon contains a nested indicator element.
    #[serde(default = "default_true")]
    pub heart: bool,
}

impl ProductEntry {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            brand: None,
            category: None,
            favorited: false,
            heart: true,
        }
    }
}

fn default_true() -> bool {
    true
}
