use clap::Parser;
use colored::Colorize;
use notetree::api::Exporter;
use notetree::config::ExportConfig;
use notetree::error::{ExportError, Result};
use notetree::logging::{default_log_level, init_logging};
use notetree::stages::tags::DanglingPolicy;
use notetree::store::archive::{is_archive, load_archive};
use notetree::store::fs::{DirSource, LocalSink};
use notetree::store::Source;

mod args;
mod print;
mod progress;

use args::Cli;
use print::{print_json, print_messages, print_summary};
use progress::TermProgress;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        default_log_level()
    };
    if let Err(e) = init_logging(level) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }

    let config = load_config(&cli)?;
    log::debug!("effective config: {:?}", config);

    if is_archive(&cli.source) {
        let source = load_archive(&cli.source)?;
        export(source, &cli, config)
    } else if cli.source.is_dir() {
        export(DirSource::new(&cli.source), &cli, config)
    } else {
        Err(ExportError::Config(format!(
            "source is neither a directory nor an archive: {}",
            cli.source.display()
        )))
    }
}

/// Defaults, then the user config (or `--config`), then flags.
fn load_config(cli: &Cli) -> Result<ExportConfig> {
    let mut config = match &cli.config {
        Some(path) => ExportConfig::load_file(path)?,
        None => match ExportConfig::user_config_dir() {
            Some(dir) => ExportConfig::load(dir)?,
            None => ExportConfig::default(),
        },
    };

    if cli.include_dates {
        config.include_dates = true;
    }
    if cli.skip_dangling_tags {
        config.dangling_tags = DanglingPolicy::Skip;
    }
    if cli.set_creation_time {
        config.set_creation_time = true;
    }
    Ok(config)
}

fn export<S: Source>(source: S, cli: &Cli, config: ExportConfig) -> Result<()> {
    let exporter = Exporter::new(source, LocalSink::new(), &cli.destination, config);
    let mut progress = TermProgress::new(!cli.quiet && !cli.json);
    let report = exporter.run(&mut progress)?;

    if cli.json {
        return print_json(&report);
    }
    print_messages(&report.messages, cli.quiet);
    if cli.verbose {
        print_summary(&report);
    }
    Ok(())
}
