use crate::adapters::console::DEFAULT_LABEL;
use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BLOCK_SIZE: usize = 1;
pub const DEFAULT_OUTPUT_DIR: &str = ".";

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "bulk", version)]
#[command(about = "Groups commands read from stdin into static and brace-delimited blocks")]
pub struct CliConfig {
    /// Commands per static block [default: 1]
    #[arg(value_name = "BLOCK_SIZE")]
    pub block_size: Option<usize>,

    /// TOML configuration file; command line values take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for per-block log files [default: .]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Prefix for blocks printed to stdout [default: "bulk: "]
    #[arg(long)]
    pub label: Option<String>,

    /// Do not print blocks to stdout
    #[arg(long)]
    pub no_console: bool,

    /// Do not write per-block log files
    #[arg(long)]
    pub no_file: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// Loads and merges the `--config` file, if one was given.
    pub fn resolve(mut self) -> Result<Self> {
        if let Some(path) = self.config.clone() {
            tracing::debug!("Loading configuration from {}", path.display());
            let file = TomlConfig::from_file(&path)?;
            file.validate()?;
            self.apply_file(file);
        }
        Ok(self)
    }

    /// Fills every value the command line left unset from `file`.
    pub fn apply_file(&mut self, file: TomlConfig) {
        if self.block_size.is_none() {
            self.block_size = file.bulk.block_size;
        }
        if self.label.is_none() {
            self.label = file.console.label;
        }
        if self.output_dir.is_none() {
            self.output_dir = file.file.output_dir;
        }
        if file.console.enabled == Some(false) {
            self.no_console = true;
        }
        if file.file.enabled == Some(false) {
            self.no_file = true;
        }
    }
}

impl ConfigProvider for CliConfig {
    fn block_size(&self) -> usize {
        self.block_size.unwrap_or(DEFAULT_BLOCK_SIZE)
    }

    fn output_dir(&self) -> &str {
        self.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR)
    }

    fn console_label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    fn console_enabled(&self) -> bool {
        !self.no_console
    }

    fn file_enabled(&self) -> bool {
        !self.no_file
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("block_size", self.block_size(), 1)?;
        validation::validate_no_line_breaks("label", self.console_label())?;
        if self.file_enabled() {
            validation::validate_path("output_dir", self.output_dir())?;
        }
        Ok(())
    }
}
