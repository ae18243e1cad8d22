use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Parser};
use envoy_builder_core::profile;
use envoy_builder_script::ScriptRenderer;

#[derive(Parser)]
#[command(
    name = "envoy-builder-gen",
    about = "Print a shell script that builds an Envoy image for a profile"
)]
#[command(version)]
#[command(group(ArgGroup::new("mode").required(true).args(["tag", "list_profiles"])))]
struct Cli {
    /// Profile to generate the build script for
    #[arg(long)]
    tag: Option<String>,

    /// Envoy configuration YAML (with @PLACEHOLDER@ tokens)
    #[arg(long, default_value = "config.yaml")]
    conf: PathBuf,

    /// List known profiles and exit
    #[arg(long)]
    list_profiles: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // The `mode` group admits exactly one of `--tag` and `--list-profiles`.
    match cli.tag {
        Some(tag) => generate(&tag, &cli.conf),
        None => list_profiles(),
    }
}

fn list_profiles() -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    for name in profile::names() {
        writeln!(stdout, "{name}").context("failed to write to stdout")?;
    }
    Ok(())
}

fn generate(tag: &str, conf: &Path) -> anyhow::Result<()> {
    // Parse the template before touching the profile or its config file.
    let renderer = ScriptRenderer::new()?;
    let script = profile::lookup(tag, conf)?;
    let output = renderer.render(&script)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write build script to stdout")?;

    tracing::info!(tag = %tag, bytes = output.len(), "build script written");
    Ok(())
}
