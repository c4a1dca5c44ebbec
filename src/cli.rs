//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use mediacache_core::DEFAULT_STORAGE_HOST;

/// Default number of concurrent fetches.
pub const DEFAULT_CONCURRENCY: u8 = 4;

/// Default size limit in MiB.
pub const DEFAULT_MAX_SIZE_MB: u64 = 30;

/// Fetch media files through a deduplicating local cache.
///
/// Prints the local path of every file that was fetched or already cached.
#[derive(Parser, Debug)]
#[command(name = "mediacache")]
#[command(author, version, about)]
pub struct Args {
    /// Content URLs to fetch (read from stdin when omitted)
    pub urls: Vec<String>,

    /// JSON posts page (`{"posts": [...]}`) whose file URLs should be fetched
    #[arg(long, value_name = "FILE")]
    pub posts: Option<PathBuf>,

    /// Blacklist entry applied to --posts, e.g. "gore" or "young -rating:s" (repeatable)
    #[arg(short = 'b', long = "blacklist", value_name = "TAGS")]
    pub blacklist: Vec<String>,

    /// Cache directory; without it every download goes to a fresh temporary file
    #[arg(short = 'd', long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Storage host accepted by the cache directory
    #[arg(long, default_value = DEFAULT_STORAGE_HOST)]
    pub host: String,

    /// Maximum file size in MiB (1-1024)
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_SIZE_MB, value_parser = clap::value_parser!(u64).range(1..=1024))]
    pub max_size_mb: u64,

    /// Maximum concurrent fetches (1-32)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY, value_parser = clap::value_parser!(u8).range(1..=32))]
    pub concurrency: u8,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["mediacache"]).unwrap();
        assert!(args.urls.is_empty());
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert_eq!(args.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(args.max_size_mb, 30);
        assert_eq!(args.host, "static1.e621.net");
        assert!(args.cache_dir.is_none());
        assert!(args.blacklist.is_empty());
    }

    #[test]
    fn test_cli_positional_urls() {
        let args = Args::try_parse_from([
            "mediacache",
            "https://static1.e621.net/data/ab/cd/abcd.png",
            "https://static1.e621.net/data/ef/01/ef01.png",
        ])
        .unwrap();
        assert_eq!(args.urls.len(), 2);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["mediacache", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_cache_dir_and_host() {
        let args = Args::try_parse_from([
            "mediacache",
            "--cache-dir",
            "/var/cache/media",
            "--host",
            "static2.example.net",
        ])
        .unwrap();
        assert_eq!(args.cache_dir, Some(PathBuf::from("/var/cache/media")));
        assert_eq!(args.host, "static2.example.net");
    }

    #[test]
    fn test_cli_blacklist_is_repeatable() {
        let args =
            Args::try_parse_from(["mediacache", "-b", "gore", "--blacklist", "young -rating:s"])
                .unwrap();
        assert_eq!(args.blacklist, vec!["gore", "young -rating:s"]);
    }

    #[test]
    fn test_cli_max_size_bounds() {
        assert!(Args::try_parse_from(["mediacache", "-m", "0"]).is_err());
        assert!(Args::try_parse_from(["mediacache", "-m", "1025"]).is_err());
        let args = Args::try_parse_from(["mediacache", "--max-size-mb", "1024"]).unwrap();
        assert_eq!(args.max_size_mb, 1024);
    }

    #[test]
    fn test_cli_concurrency_bounds() {
        assert!(Args::try_parse_from(["mediacache", "-c", "0"]).is_err());
        assert!(Args::try_parse_from(["mediacache", "-c", "33"]).is_err());
        let args = Args::try_parse_from(["mediacache", "-c", "32"]).unwrap();
        assert_eq!(args.concurrency, 32);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["mediacache", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["mediacache", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
