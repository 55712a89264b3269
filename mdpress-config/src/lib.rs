//! Shared configuration loader for mdpress hosts.
//!
//! `defaults/mdpress.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`MdpressConfig`], then convert the sections into renderer options.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use mdpress::error::FormatError;
use mdpress::formats::html::{HtmlOptions, HtmlTheme};
use mdpress::formats::pdf::{FontOptions, PageSetup};
use mdpress::formats::word::WordOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/mdpress.default.toml");

/// Top-level configuration consumed by mdpress applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MdpressConfig {
    pub history: HistoryConfig,
    pub convert: ConvertConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    pub max_items: usize,
}

/// Format-specific conversion knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub html: HtmlConfig,
    pub pdf: PdfConfig,
    pub word: WordConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    pub theme: ThemeName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Light,
    Dark,
}

impl From<ThemeName> for HtmlTheme {
    fn from(name: ThemeName) -> Self {
        match name {
            ThemeName::Light => HtmlTheme::Light,
            ThemeName::Dark => HtmlTheme::Dark,
        }
    }
}

impl From<&HtmlConfig> for HtmlOptions {
    fn from(config: &HtmlConfig) -> Self {
        HtmlOptions::new(config.theme.into())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    pub page_size: PdfPageSize,
    pub margin: f32,
    pub block_spacing: f32,
    pub body_size: f32,
    pub code_size: f32,
    pub line_height: f32,
    #[serde(default)]
    pub fonts: PdfFontsConfig,
}

/// Fonts consulted after the bundled ones, for scripts they do not cover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PdfFontsConfig {
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    #[serde(default)]
    pub system_families: Vec<String>,
}

impl From<&PdfFontsConfig> for FontOptions {
    fn from(config: &PdfFontsConfig) -> Self {
        FontOptions {
            paths: config.paths.clone(),
            system_families: config.system_families.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfPageSize {
    A4,
    Letter,
}

impl TryFrom<&PdfConfig> for PageSetup {
    type Error = FormatError;

    fn try_from(config: &PdfConfig) -> Result<Self, Self::Error> {
        let paper = match config.page_size {
            PdfPageSize::A4 => PageSetup::a4(),
            PdfPageSize::Letter => PageSetup::letter(),
        };
        let setup = PageSetup {
            margin: config.margin,
            block_spacing: config.block_spacing,
            body_size: config.body_size,
            code_size: config.code_size,
            line_height: config.line_height,
            ..paper
        };
        setup.validate()?;
        Ok(setup)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WordConfig {
    pub margin: f32,
}

impl From<&WordConfig> for WordOptions {
    fn from(config: &WordConfig) -> Self {
        WordOptions {
            margin: config.margin,
            ..WordOptions::default()
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MdpressConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MdpressConfig, ConfigError> {
    Loader::new().build()
}
