use clap::Parser;
use std::path::PathBuf;

/// Version string. Dev builds carry the git hash.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("NOTETREE_GIT_HASH");
    const IS_RELEASE: &str = env!("NOTETREE_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{} (dev: {})", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "notetree", bin_name = "notetree", version = get_version())]
#[command(
    about = "Convert a flat note export into a folder tree of Markdown notes",
    long_about = None
)]
pub struct Cli {
    /// Export directory, or a .jex / .tar / .tgz archive
    pub source: PathBuf,

    /// Directory to write the note tree into
    pub destination: PathBuf,

    /// Add created, updated and joplin_id lines to the front matter
    #[arg(long)]
    pub include_dates: bool,

    /// Skip tag associations that point at a missing note or tag instead of failing
    #[arg(long)]
    pub skip_dangling_tags: bool,

    /// Also set file creation times (macOS only)
    #[arg(long)]
    pub set_creation_time: bool,

    /// Read settings from this JSON file instead of the user config
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_and_flags() {
        let cli = Cli::try_parse_from([
            "notetree",
            "export",
            "out",
            "--include-dates",
            "--skip-dangling-tags",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.source, PathBuf::from("export"));
        assert_eq!(cli.destination, PathBuf::from("out"));
        assert!(cli.include_dates);
        assert!(cli.skip_dangling_tags);
        assert!(!cli.set_creation_time);
        assert!(cli.verbose);
    }

    #[test]
    fn test_destination_is_required() {
        assert!(Cli::try_parse_from(["notetree", "export"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["notetree", "a", "b", "-q", "-v"]).is_err());
    }
}
