//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use animesubinfo::{SortBy, TitleType};
use clap::{Args, Parser, Subcommand};

/// Search and download Polish anime subtitles from AnimeSub.info.
#[derive(Parser, Debug)]
#[command(name = "animesubinfo")]
#[command(author, version, about)]
#[command(after_help = "Exit codes:\n  0 = success\n  1 = no matching subtitle (best) or error\n  2 = usage error")]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for anime subtitles
    Search(SearchArgs),
    /// Find the best matching subtitle for an anime file
    Find(FindArgs),
    /// Download a subtitle file
    Download(DownloadArgs),
    /// Find and download the best matching subtitle
    Best(BestArgs),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Anime title to search for
    pub title: String,

    /// Sort order: traf (relevance), datad (newest), pobrn (downloads)
    #[arg(short, long, default_value = "traf", value_parser = parse_sort_by)]
    pub sort: SortBy,

    /// Title column to search: org, en, pl
    #[arg(short = 't', long = "type", default_value = "org", value_parser = parse_title_type)]
    pub title_type: TitleType,

    /// Maximum number of result pages to fetch
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Print results as JSON
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct FindArgs {
    /// Anime video file (only the name is used)
    pub file: PathBuf,

    /// Print the match as JSON
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Subtitle ID from search results
    pub subtitle_id: u32,

    /// Output path (defaults to the server file name in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct BestArgs {
    /// Anime video file; the subtitle is saved next to it
    pub file: PathBuf,
}

fn parse_sort_by(value: &str) -> Result<SortBy, String> {
    value.parse().map_err(|e| format!("{e}"))
}

fn parse_title_type(value: &str) -> Result<TitleType, String> {
    value.parse().map_err(|e| format!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_search_defaults() {
        let cli = Cli::try_parse_from(["animesubinfo", "search", "Yuru Camp"]).unwrap();
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.title, "Yuru Camp");
        assert_eq!(args.sort, SortBy::Fitness);
        assert_eq!(args.title_type, TitleType::Original);
        assert_eq!(args.limit, None);
        assert!(!args.json);
    }

    #[test]
    fn test_cli_search_options_case_insensitive() {
        let cli = Cli::try_parse_from([
            "animesubinfo",
            "search",
            "Bakuman",
            "-s",
            "POBRN",
            "--type",
            "En",
            "-l",
            "3",
            "-j",
        ])
        .unwrap();
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.sort, SortBy::Downloads);
        assert_eq!(args.title_type, TitleType::English);
        assert_eq!(args.limit, Some(3));
        assert!(args.json);
    }

    #[test]
    fn test_cli_search_rejects_invalid_values() {
        let err = Cli::try_parse_from(["animesubinfo", "search", "x", "-s", "rating"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Cli::try_parse_from(["animesubinfo", "search", "x", "-t", "jp"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Cli::try_parse_from(["animesubinfo", "search", "x", "-l", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_missing_positionals() {
        for command in ["search", "find", "download", "best"] {
            let err = Cli::try_parse_from(["animesubinfo", command]).unwrap_err();
            assert_eq!(
                err.kind(),
                ErrorKind::MissingRequiredArgument,
                "command {command}"
            );
        }
    }

    #[test]
    fn test_cli_download_output() {
        let cli =
            Cli::try_parse_from(["animesubinfo", "download", "12345", "-o", "subs.zip"]).unwrap();
        let Command::Download(args) = cli.command else {
            panic!("expected download");
        };
        assert_eq!(args.subtitle_id, 12345);
        assert_eq!(args.output, Some(PathBuf::from("subs.zip")));
    }

    #[test]
    fn test_cli_download_rejects_non_numeric_id() {
        let err = Cli::try_parse_from(["animesubinfo", "download", "abc"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_global_verbosity_flags() {
        let cli = Cli::try_parse_from(["animesubinfo", "-vv", "find", "a.mkv"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["animesubinfo", "best", "a.mkv", "--quiet"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let err = Cli::try_parse_from(["animesubinfo"]).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand | ErrorKind::MissingSubcommand
        ));
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Cli::try_parse_from(["animesubinfo", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
