//! `sw-manifest` command line entry point.
//!
//! Compiles an offline caching config against a built site and writes the manifest next to it.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use offline_sw_manifest::{Config, DiskFilesystem, Filesystem, ManifestBuilder};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const MANIFEST_FILE: &str = "ngsw.json";

/// Generate a service worker manifest for a built site
#[derive(Parser)]
#[command(name = "sw-manifest")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Directory containing the built site
  dist_dir: PathBuf,

  /// Offline caching config (JSON, or YAML with a .yaml/.yml extension)
  config: PathBuf,

  /// URL prefix the site is served under
  #[arg(default_value = "/")]
  base_href: String,

  /// Manifest output path, defaults to ngsw.json inside the site directory
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::new("info")
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!("{:?}", e);
      ExitCode::from(1)
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let config = Config::from_path(&cli.config)
    .with_context(|| format!("failed to load config {}", cli.config.display()))?;

  // The manifest must not list itself on the next run.
  let site = DiskFilesystem::new(&cli.dist_dir);
  let output_site_path = match &cli.output {
    Some(output) => site.site_path_of(output),
    None => Some(MANIFEST_FILE.to_string()),
  };
  let mut site = match output_site_path {
    Some(path) => site.ignore(&path),
    None => site,
  };
  let manifest = ManifestBuilder::new(&site, cli.base_href.as_str())
    .process(&config)
    .with_context(|| format!("failed to compile manifest for {}", cli.dist_dir.display()))?;
  let json = manifest
    .to_json_pretty()
    .context("failed to serialise manifest")?;

  match &cli.output {
    Some(output) => {
      if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
          .with_context(|| format!("failed to create {}", parent.display()))?;
      }
      fs::write(output, &json).with_context(|| format!("failed to write {}", output.display()))?;
      info!("wrote {}", output.display());
    }
    None => {
      site.write(MANIFEST_FILE, json.as_bytes())?;
      info!("wrote {}", site.root().join(MANIFEST_FILE).display());
    }
  }

  Ok(())
}
