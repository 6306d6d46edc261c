use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::Level;
use treesync::commands::sync;
use treesync::config::{orient_roots, Cli};
use treesync::executor::ConfirmationGate;
use treesync::ui::{AssumeYes, TerminalPrompt};
use treesync::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let no_swap = cli.no_swap;
    let mut config = Config::try_from(cli)?;

    config.source = resolve(&config.source);
    config.target = resolve(&config.target);
    if !no_swap {
        let cwd = resolve(&std::env::current_dir()?);
        let (source, target) = orient_roots(&cwd, config.source, config.target);
        config.source = source;
        config.target = target;
    }
    config.self_path = std::env::current_exe().ok().map(|exe| resolve(&exe));
    tracing::debug!("resolved configuration: {:?}", config);

    let mut gate: Box<dyn ConfirmationGate> = if config.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalPrompt::new())
    };

    sync::run(&config, gate.as_mut())?;
    Ok(())
}

fn setup_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}

/// Absolute, symlink-free form of `path`, or `path` itself if it cannot be resolved.
fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
