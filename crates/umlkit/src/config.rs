//! Configuration types for the UML extension.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining rule and style settings.
//! - [`RulesConfig`] - Connection rule switches and the rule provider priority.
//! - [`StyleConfig`] - Fallback color and size, and the diagram background.
//!
//! # Example
//!
//! ```
//! # use umlkit::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [rules]
//!     ignore_connection_rules = true
//!
//!     [style]
//!     default_color = "navy"
//!     "#,
//! )
//! .unwrap();
//!
//! assert!(config.rules().ignore_connection_rules());
//! assert!(config.rules().carry_mode_override());
//! assert_eq!(config.rules().priority(), 2000);
//! ```

use serde::Deserialize;

use umlkit_core::{color::Color, geometry::Size, presentation::Presentation};

use crate::UmlError;

/// Priority the rule provider registers with unless configured otherwise.
pub const DEFAULT_RULE_PRIORITY: u32 = 2000;

/// Top-level configuration combining rule and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Rule configuration section.
    #[serde(default)]
    rules: RulesConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified rule and style configurations.
    pub fn new(rules: RulesConfig, style: StyleConfig) -> Self {
        Self { rules, style }
    }

    /// Returns the rule configuration.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Switches of the relationship rule engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Accept every connection between UML elements with the current kind.
    ignore_connection_rules: bool,

    /// Write the kind chosen by a connection decision back into the mode
    /// state (extension onto an interface, connections touching a comment).
    carry_mode_override: bool,

    /// Priority of the rule provider in the host's rule dispatch.
    priority: u32,
}

impl RulesConfig {
    pub fn new(ignore_connection_rules: bool, carry_mode_override: bool, priority: u32) -> Self {
        Self {
            ignore_connection_rules,
            carry_mode_override,
            priority,
        }
    }

    pub fn ignore_connection_rules(&self) -> bool {
        self.ignore_connection_rules
    }

    pub fn carry_mode_override(&self) -> bool {
        self.carry_mode_override
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new(false, true, DEFAULT_RULE_PRIORITY)
    }
}

/// Visual styling configuration.
///
/// Color fields hold CSS color strings and are parsed on access.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Stroke color for kinds without an entry in the color table.
    default_color: String,

    /// Creation size for kinds without an entry in the size table.
    default_size: Size,

    /// Background of exported diagrams.
    background_color: Option<String>,
}

impl StyleConfig {
    pub fn new(default_color: &str, default_size: Size, background_color: Option<&str>) -> Self {
        Self {
            default_color: default_color.to_string(),
            default_size,
            background_color: background_color.map(str::to_string),
        }
    }

    /// Returns the parsed fallback [`Color`].
    ///
    /// # Errors
    ///
    /// Returns [`UmlError::Config`] if the configured string is not a color.
    pub fn default_color(&self) -> Result<Color, UmlError> {
        Ok(Color::new(&self.default_color)?)
    }

    /// Returns the fallback size.
    ///
    /// # Errors
    ///
    /// Returns [`UmlError::Config`] unless both dimensions are positive.
    pub fn default_size(&self) -> Result<Size, UmlError> {
        if self.default_size.is_positive() {
            Ok(self.default_size)
        } else {
            Err(UmlError::Config(format!(
                "default size must be positive, got {}x{}",
                self.default_size.width(),
                self.default_size.height()
            )))
        }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns [`UmlError::Config`] if the configured string is not a color.
    pub fn background_color(&self) -> Result<Option<Color>, UmlError> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| UmlError::Config(format!("Invalid background color in config: {err}")))
    }

    /// Presentation tables with this configuration's fallbacks.
    pub fn presentation(&self) -> Result<Presentation, UmlError> {
        Ok(Presentation::new(self.default_color()?, self.default_size()?))
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::new("black", Presentation::DEFAULT_SIZE, None)
    }
}
