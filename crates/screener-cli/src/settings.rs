use std::path::PathBuf;

use anyhow::Context;
use screener_core::ProfileSchema;
use screener_core::config_file::{
    ArchiveConfig, ConfigFile, DisplayConfig, OutputConfig, ProfileConfig,
};
use screener_reporting::ExportFormat;

pub const DEFAULT_PROFILE_PATH: &str = "requirements.json";
pub const DEFAULT_OUTPUT_PATH: &str = "output/cv_matching_report.csv";

/// Values given on the command line; `None`/`false` means "not given".
#[derive(Debug, Default)]
pub struct Overrides {
    pub profile: Option<PathBuf>,
    pub strict: bool,
    pub output: Option<PathBuf>,
    pub format: Option<ExportFormat>,
    pub max_archive_mb: Option<u32>,
    pub no_color: bool,
}

/// Effective settings for one run: CLI flags > config file > defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub profile_path: PathBuf,
    pub schema: ProfileSchema,
    pub output_path: PathBuf,
    pub format: ExportFormat,
    /// Total expanded bytes allowed per archive; 0 = unlimited.
    pub max_archive_bytes: u64,
    pub color: bool,
}

impl Settings {
    pub fn resolve(config: &ConfigFile, cli: Overrides) -> anyhow::Result<Self> {
        let profile_cfg = config.profile.clone().unwrap_or_default();
        let output_cfg = config.output.clone().unwrap_or_default();

        let profile_path = cli
            .profile
            .or_else(|| profile_cfg.path.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_PATH));

        let schema = if cli.strict || profile_cfg.strict.unwrap_or(false) {
            ProfileSchema::Strict
        } else {
            ProfileSchema::Lenient
        };

        let output_path = cli
            .output
            .or_else(|| output_cfg.path.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

        let config_format = output_cfg
            .format
            .as_deref()
            .map(|f| {
                f.parse::<ExportFormat>()
                    .map_err(anyhow::Error::msg)
                    .context("invalid [output] format in config file")
            })
            .transpose()?;
        let format = cli
            .format
            .or(config_format)
            .or_else(|| ExportFormat::from_path(&output_path))
            .unwrap_or_default();

        let max_archive_mb = cli
            .max_archive_mb
            .or_else(|| config.archive.as_ref().and_then(|a| a.max_size_mb))
            .unwrap_or(0);

        let color = !cli.no_color && config.display.as_ref().and_then(|d| d.color).unwrap_or(true);

        Ok(Self {
            profile_path,
            schema,
            output_path,
            format,
            max_archive_bytes: u64::from(max_archive_mb) * 1024 * 1024,
            color,
        })
    }

    /// These settings in config-file form, e.g. to persist them.
    pub fn to_config(&self) -> ConfigFile {
        ConfigFile {
            profile: Some(ProfileConfig {
                path: Some(self.profile_path.display().to_string()),
                strict: Some(self.schema == ProfileSchema::Strict),
            }),
            output: Some(OutputConfig {
                path: Some(self.output_path.display().to_string()),
                format: Some(self.format.extension().to_string()),
            }),
            archive: Some(ArchiveConfig {
                max_size_mb: Some((self.max_archive_bytes / 1024 / 1024) as u32),
            }),
            display: Some(DisplayConfig {
                color: Some(self.color),
            }),
        }
    }
}
