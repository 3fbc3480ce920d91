//! k8s-overlay-patch - Applies overlays to rendered k8s manifests.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use k8s_overlay_patch::{OverlaySpec, PatchContext, PatchEngine};
use log::debug;

#[derive(Debug, Parser)]
#[command(name = "k8s-overlay-patch", version, about = "Applies overlays to rendered k8s manifests")]
struct Cli {
    /// File containing the patch to apply
    #[arg(short = 'p', long = "patch-file")]
    patch_file: PathBuf,

    /// File containing the rendered manifests to patch (default: stdin)
    #[arg(short = 'm', long = "manifest-file")]
    manifest_file: Option<PathBuf>,

    /// Namespace to use when patching the manifests
    #[arg(short = 'n', long, env = "OVERLAY_NAMESPACE", default_value = "")]
    namespace: String,

    /// File to write the patched manifests to (default: stdout)
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Log every overlay and patch as it is applied
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::new();
    logger.filter_level(if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });
    let _ = logger.parse_default_env().try_init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the patched manifest was written but errors were
/// collected on the way.
fn run(cli: &Cli) -> Result<bool> {
    let patch_text = fs::read_to_string(&cli.patch_file)
        .with_context(|| format!("failed to read patch file {}", cli.patch_file.display()))?;
    let spec = OverlaySpec::from_yaml(&patch_text)
        .with_context(|| format!("failed to parse patch file {}", cli.patch_file.display()))?;

    let manifest = match &cli.manifest_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read manifest from stdin")?;
            buf
        }
    };
    debug!(
        "loaded {} overlays, default namespace {:?}",
        spec.overlays.len(),
        cli.namespace
    );

    let ctx = PatchContext::default().verbose(cli.verbose);
    let outcome = PatchEngine::new(ctx, cli.namespace.clone()).run(&manifest, &spec.overlays);

    for e in outcome.errors.iter() {
        eprintln!("Error: {}", e);
    }
    if !outcome.errors.is_empty() {
        return Ok(false);
    }

    let mut output: Box<dyn Write> = match &cli.out {
        Some(path) => Box::new(
            fs::File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    output
        .write_all(outcome.manifest.as_bytes())
        .context("failed to write patched manifest")?;
    output.flush()?;
    Ok(true)
}
