use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Endpoint and sampling defaults
    pub api: ApiConfig,

    /// Default pipeline behavior
    pub process: ProcessConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig
{
    pub url: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig
{
    pub clean: bool,
    pub fix: bool,
    pub auto_save: bool,
    pub project_folder: bool,
}

impl Default for ApiConfig
{
    fn default() -> Self
    {
        Self {
            url: "http://localhost:1234/v1/chat/completions".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            stream: false,
        }
    }
}

pub fn load_config() -> Result<Config>
{
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["codestill.toml", ".codestill.toml"];

    for path in &config_paths
    {
        if Path::new(path).exists()
        {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // Add environment variables with CODESTILL_ prefix
    builder = builder.add_source(config::Environment::with_prefix("CODESTILL").separator("_"));

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("codestill.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("DRY RUN: Would write config to {}", config_path.display());
        }
        return Ok(());
    }

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn defaults_point_at_the_local_server()
    {
        let cfg = Config::default();
        assert!(cfg.api.url.starts_with("http://localhost:1234"));
        assert_eq!(cfg.api.max_tokens, 2000);
        assert!(!cfg.process.fix);
    }

    #[test]
    fn default_config_round_trips_through_toml()
    {
        let cfg = Config::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.api.url, cfg.api.url);
        assert_eq!(back.process.clean, cfg.process.clean);
    }

    #[test]
    fn partial_config_fills_in_defaults()
    {
        let back: Config = toml::from_str("[api]\ntemperature = 0.2\n").unwrap();
        assert_eq!(back.api.temperature, 0.2);
        assert_eq!(back.api.max_tokens, 2000);
    }
}
