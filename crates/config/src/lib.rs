//! Layered configuration for snapsku.
//!
//! Values are resolved in order, each layer overriding the last:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. A configuration file (TOML, YAML or JSON, chosen by extension). Either
//!    passed explicitly, or `config.toml` in the platform config directory
//!    when one exists there.
//! 3. Environment variables prefixed `SNAPSKU_`, with `__` separating nested
//!    keys (`SNAPSKU_ENCODER__QUALITY=0.8`).
//!
//! ```toml
//! [catalog]
//! page_size = 200
//!
//! [matcher]
//! numeric_fallback_brands = ["Legacy Co"]
//!
//! [encoder]
//! format = "webp"
//! quality = 0.9
//!
//! [pipeline]
//! inter_file_delay_ms = 200
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use snapsku_catalog::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use snapsku_encode::{DEFAULT_QUALITY, OutputFormat};
use snapsku_matcher::DEFAULT_MIN_TOKEN_LEN;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SNAPSKU_";
/// Pause between consecutive files of a batch, in milliseconds.
pub const DEFAULT_INTER_FILE_DELAY_MS: u64 = 200;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub matcher: MatcherConfig,
    pub encoder: EncoderConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Products requested per catalog page.
    pub page_size: usize,
    /// Give up paging after this many pages.
    pub max_pages: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Shortest filename token considered for exact matches.
    pub min_token_len: usize,
    /// Brands whose SKUs are purely numeric and get the digit-run fallback.
    pub numeric_fallback_brands: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            numeric_fallback_brands: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub format: OutputFormat,
    /// Fraction in `(0, 1]`.
    pub quality: f32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            quality: DEFAULT_QUALITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub inter_file_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inter_file_delay_ms: DEFAULT_INTER_FILE_DELAY_MS,
        }
    }
}

impl PipelineConfig {
    pub fn inter_file_delay(&self) -> Duration {
        Duration::from_millis(self.inter_file_delay_ms)
    }
}

impl Config {
    /// `config.toml` in the platform configuration directory (for example
    /// `~/.config/snapsku/config.toml` on Linux).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "snapsku").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load, merge and validate configuration.
    ///
    /// With no explicit `file`, the [default path](Self::default_path) is
    /// used if a file exists there; otherwise only defaults and environment
    /// variables apply.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = match file {
            Some(file) => Some(file.to_path_buf()),
            None => Self::default_path().filter(|path| path.is_file()),
        };
        Self::from_figment(&Self::figment(file.as_deref())?)
    }

    /// The layered [`Figment`] without extracting it. An explicit `file` must
    /// exist and have a `.toml`, `.yaml`, `.yml` or `.json` extension.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            if !path.is_file() {
                exn::bail!(ErrorKind::Load(format!("file not found: {}", path.display())));
            }
            tracing::debug!(path = %path.display(), "Loading configuration file");
            let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
            figment = match extension.as_deref() {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => exn::bail!(ErrorKind::Load(format!("unsupported file extension: {}", path.display()))),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extract and [validate](Self::validate) a configuration.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load("could not extract settings".to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a batch misbehave.
    pub fn validate(&self) -> Result<()> {
        let quality = self.encoder.quality;
        if !(quality > 0.0 && quality <= 1.0) {
            exn::bail!(ErrorKind::Invalid(format!("encoder.quality must be in (0, 1], got {quality}")));
        }
        if self.catalog.page_size == 0 {
            exn::bail!(ErrorKind::Invalid("catalog.page_size must be at least 1".to_string()));
        }
        if self.catalog.max_pages == 0 {
            exn::bail!(ErrorKind::Invalid("catalog.max_pages must be at least 1".to_string()));
        }
        if self.matcher.min_token_len == 0 {
            exn::bail!(ErrorKind::Invalid("matcher.min_token_len must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.catalog.page_size, 200);
        assert_eq!(config.catalog.max_pages, 500);
        assert_eq!(config.matcher.min_token_len, 2);
        assert!(config.matcher.numeric_fallback_brands.is_empty());
        assert_eq!(config.encoder.format, OutputFormat::WebP);
        assert_eq!(config.encoder.quality, 0.90);
        assert_eq!(config.pipeline.inter_file_delay(), Duration::from_millis(200));
        config.validate().unwrap();
    }

    #[rstest]
    #[case(
        "snapsku.toml",
        "[encoder]\nformat = \"jpeg\"\nquality = 0.75\n[matcher]\nnumeric_fallback_brands = [\"Legacy\"]\n"
    )]
    #[case("snapsku.yaml", "encoder:\n  format: jpeg\n  quality: 0.75\nmatcher:\n  numeric_fallback_brands: [Legacy]\n")]
    #[case(
        "snapsku.JSON",
        r#"{"encoder": {"format": "jpeg", "quality": 0.75}, "matcher": {"numeric_fallback_brands": ["Legacy"]}}"#
    )]
    fn test_file_overrides_defaults(#[case] name: &str, #[case] contents: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        let config = Config::from_figment(&Config::figment(Some(&path)).unwrap()).unwrap();
        assert_eq!(config.encoder.format, OutputFormat::Jpeg);
        assert_eq!(config.encoder.quality, 0.75);
        assert_eq!(config.matcher.numeric_fallback_brands, vec!["Legacy".to_string()]);
        // Untouched sections keep their defaults.
        assert_eq!(config.catalog, CatalogConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::figment(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load(_)));
    }

    #[test]
    fn test_unknown_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapsku.ini");
        std::fs::write(&path, "quality=1").unwrap();
        let err = Config::figment(Some(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load(_)));
    }

    #[test]
    fn test_malformed_value_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapsku.toml");
        std::fs::write(&path, "[encoder]\nquality = \"high\"\n").unwrap();
        let err = Config::from_figment(&Config::figment(Some(&path)).unwrap()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load(_)));
        // The figment error is kept underneath, naming the offending key.
        let cause = err.frame().children()[0].error().to_string();
        assert!(cause.contains("quality"), "{cause}");
    }

    #[rstest]
    #[case(|c: &mut Config| c.encoder.quality = 0.0)]
    #[case(|c: &mut Config| c.encoder.quality = 1.01)]
    #[case(|c: &mut Config| c.encoder.quality = f32::NAN)]
    #[case(|c: &mut Config| c.catalog.page_size = 0)]
    #[case(|c: &mut Config| c.catalog.max_pages = 0)]
    #[case(|c: &mut Config| c.matcher.min_token_len = 0)]
    fn test_validate_rejects(#[case] mutate: fn(&mut Config)) {
        let mut config = Config::default();
        mutate(&mut config);
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_quality_of_one_is_valid() {
        let mut config = Config::default();
        config.encoder.quality = 1.0;
        config.validate().unwrap();
    }

    #[test]
    fn test_environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("snapsku.yaml", "encoder:\n  quality: 0.75\npipeline:\n  inter_file_delay_ms: 50\n")?;
            jail.set_env("SNAPSKU_ENCODER__QUALITY", "0.5");
            jail.set_env("SNAPSKU_ENCODER__FORMAT", "jpeg");
            let config = Config::from_figment(&Config::figment(Some(Path::new("snapsku.yaml"))).unwrap()).unwrap();
            assert_eq!(config.encoder.quality, 0.5);
            assert_eq!(config.encoder.format, OutputFormat::Jpeg);
            assert_eq!(config.pipeline.inter_file_delay_ms, 50);
            Ok(())
        });
    }

    #[test]
    fn test_environment_value_is_validated() {
        Jail::expect_with(|jail| {
            jail.set_env("SNAPSKU_CATALOG__PAGE_SIZE", "0");
            let err = Config::from_figment(&Config::figment(None).unwrap()).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid(_)));
            Ok(())
        });
    }
}
