mod args;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tailor_core::parsers::parse_auto;
use tailor_core::{Resolver, ThemeSource};
use tailor_protocol::ThemeConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let sources = read_sources(&cli.sources)?;

    let resolver = Resolver::new(cli.resolver_options());
    match resolver.load(&sources) {
        Ok(config) => {
            write_config(&config, cli.compact)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            for error in &errors {
                eprintln!("error: {error}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_sources(paths: &[PathBuf]) -> Result<Vec<ThemeSource>> {
    paths.iter().map(PathBuf::as_path).map(read_source).collect()
}

fn read_source(path: &Path) -> Result<ThemeSource> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let source = parse_auto(&data).with_context(|| format!("parsing {}", path.display()))?;
    info!(path = %path.display(), "loaded source");
    Ok(source)
}

fn write_config(config: &ThemeConfig, compact: bool) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if compact {
        serde_json::to_writer(&mut out, config)?;
    } else {
        serde_json::to_writer_pretty(&mut out, config)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../core/tests/fixtures").join(name)
    }

    #[test]
    fn reads_sources_in_order() {
        let sources =
            read_sources(&[fixture("base.config.js"), fixture("palette-revision.json")]).unwrap();
        assert_eq!(sources.len(), 2);
        assert!(sources[0].content.is_some());
        assert!(sources[1].safelist.is_some());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_sources(&[fixture("base.config.js"), fixture("missing.json")]).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
