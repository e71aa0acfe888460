// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use the_codebook::config::{builtin_manifest, load_manifest_dir, load_manifests, Manifest};
use the_codebook::errors::BuildError;
use the_codebook::observability::messages::registry::RegistryReloadFailed;
use the_codebook::observability::messages::StructuredLog;
use the_codebook::registry::snapshot::write_snapshot;
use the_codebook::registry::{RegistryBuilder, RegistryHandle, RegistryIndex};
use the_codebook::request::{Request, RequestHandler, RequestInput, RequestOutcome};
use the_codebook::traits::DefinitionSource;
use tracing_subscriber::EnvFilter;

/// Command line options, parsed by hand.
#[derive(Debug, Default)]
struct CliArgs {
    manifests: Vec<PathBuf>,
    manifest_dir: Option<PathBuf>,
    no_builtin: bool,
    json: Option<String>,
    export: Option<PathBuf>,
    watch: Option<u64>,
    help: bool,
    command: Vec<String>,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [options] [command...]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --manifest <file>      Add a YAML/TOML/JSON definition manifest (repeatable)");
    eprintln!("  --manifest-dir <dir>   Add every manifest in <dir>, sorted by file name");
    eprintln!("  --no-builtin           Do not load the embedded universal catalog");
    eprintln!("  --json '<request>'     Handle a JSON request (code, command, object or batch)");
    eprintln!("  --export <file.csv>    Write a CSV snapshot of the registry");
    eprintln!("  --watch <seconds>      Re-read manifests periodically until Ctrl-C; on change,");
    eprintln!("                         rewrite --export and answer the request again");
    eprintln!("  -h, --help             Show this help");
    eprintln!();
    eprintln!("Commands: <code> | search <term> | suggest <concept> | validate <code> <symbol> <system> | summary | help");
    eprintln!("Example: {} 11", program);
    eprintln!("Example: {} --json '{{\"operation\": \"suggest\", \"concept\": \"payments\", \"size\": 20}}'", program);
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{} requires a value", flag))
        };
        match arg.as_str() {
            "--manifest" => cli.manifests.push(PathBuf::from(value(arg)?)),
            "--manifest-dir" => cli.manifest_dir = Some(PathBuf::from(value(arg)?)),
            "--no-builtin" => cli.no_builtin = true,
            "--json" => cli.json = Some(value(arg)?),
            "--export" => cli.export = Some(PathBuf::from(value(arg)?)),
            "--watch" => {
                let raw = value(arg)?;
                let seconds: u64 = raw
                    .parse()
                    .with_context(|| format!("--watch expects seconds, got '{}'", raw))?;
                cli.watch = Some(seconds.max(1));
            }
            "-h" | "--help" => cli.help = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            _ => cli.command.push(arg.clone()),
        }
    }

    if cli.json.is_some() && !cli.command.is_empty() {
        bail!("Pass either --json or a command, not both");
    }
    Ok(cli)
}

/// Every manifest the options name, builtin first, then files, then the directory.
fn load_sources(cli: &CliArgs) -> Result<Vec<Manifest>> {
    let mut manifests = Vec::new();
    if !cli.no_builtin {
        manifests.push(builtin_manifest().context("embedded catalog is invalid")?);
    }
    manifests.extend(load_manifests(&cli.manifests)?);
    if let Some(dir) = &cli.manifest_dir {
        manifests.extend(load_manifest_dir(dir)?);
    }
    if manifests.is_empty() {
        bail!("No definitions: --no-builtin needs --manifest or --manifest-dir");
    }
    Ok(manifests)
}

fn as_sources(manifests: &[Manifest]) -> Vec<&dyn DefinitionSource> {
    manifests.iter().map(|m| m as &dyn DefinitionSource).collect()
}

fn build_index(manifests: &[Manifest]) -> Result<RegistryIndex, BuildError> {
    as_sources(manifests)
        .into_iter()
        .try_fold(RegistryBuilder::new(), |builder, source| builder.with_source(source))?
        .build()
}

fn export(index: &RegistryIndex, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create '{}'", path.display()))?;
    write_snapshot(index, BufWriter::new(file))
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    eprintln!("Wrote {} codes to {}", index.len(), path.display());
    Ok(())
}

/// Answer the `--json` request or the command, if either was given.
fn respond(cli: &CliArgs, index: Arc<RegistryIndex>) -> Option<RequestOutcome> {
    let handler = RequestHandler::new(index);
    match (&cli.json, cli.command.is_empty()) {
        (Some(json), _) => Some(handler.handle_json(json)),
        (None, false) => Some(handler.handle(&RequestInput::Command(cli.command.join(" ")))),
        (None, true) => None,
    }
}

fn print_outcome(outcome: &RequestOutcome) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}

/// Re-read the manifests and, if they changed, rebuild and swap. The new index
/// then refreshes the `--export` file and answers the request again.
///
/// Returns whether a swap happened. On error the current index stays in place.
fn reload(handle: &RegistryHandle, cli: &CliArgs, current: &mut Vec<Manifest>) -> Result<bool> {
    let manifests = load_sources(cli)?;
    if manifests == *current {
        return Ok(false);
    }
    handle.rebuild(&as_sources(&manifests))?;
    *current = manifests;

    let index = handle.index();
    if let Some(path) = &cli.export {
        export(&index, path)?;
    }
    if let Some(outcome) = respond(cli, index) {
        print_outcome(&outcome)?;
    }
    Ok(true)
}

/// Reload on every tick until Ctrl-C.
async fn watch(handle: &RegistryHandle, cli: &CliArgs, mut current: Vec<Manifest>, seconds: u64) {
    let mut ticker = tokio::time::interval(Duration::from_secs(seconds));
    // The first tick completes immediately.
    ticker.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    eprintln!("Watching manifests every {}s (Ctrl-C to stop)", seconds);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = reload(handle, cli, &mut current) {
                    RegistryReloadFailed {
                        version: handle.version(),
                        error: &*err,
                    }
                    .log();
                }
            }
            _ = &mut shutdown => break,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("the-codebook");
    let cli = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            print_usage(program);
            std::process::exit(2);
        }
    };
    if cli.help {
        print_usage(program);
        return Ok(());
    }

    let manifests = load_sources(&cli)?;
    let index = build_index(&manifests).context("failed to build the registry")?;
    let handle = RegistryHandle::new(index);

    if let Some(path) = &cli.export {
        export(&handle.index(), path)?;
    }

    let outcome = respond(&cli, handle.index()).or_else(|| {
        (cli.export.is_none() && cli.watch.is_none())
            .then(|| RequestHandler::new(handle.index()).handle_request(&Request::Help))
    });

    let mut failed = false;
    if let Some(outcome) = outcome {
        print_outcome(&outcome)?;
        failed = !outcome.is_success();
    }

    if let Some(seconds) = cli.watch {
        watch(&handle, &cli, manifests, seconds).await;
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
