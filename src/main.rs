use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use covview::cli;
use covview::report::ReportConfig;

/// covview: static HTML reports for Go coverage profiles.
#[derive(Parser)]
#[command(name = "covview", version, about)]
struct Cli {
    /// Coverage profile produced by `go test -coverprofile`.
    #[arg(long, default_value = "coverage.out")]
    profile: PathBuf,

    /// Output directory for the generated HTML files.
    #[arg(long, default_value = "coverage")]
    out: PathBuf,

    /// Module root on disk (the directory containing go.mod).
    #[arg(long, default_value = ".")]
    src: PathBuf,

    /// Remove the output directory before generating files.
    #[arg(long)]
    clean: bool,

    /// Suppress progress and statistics output.
    #[arg(long, short)]
    quiet: bool,

    /// Also write file metrics, totals and the directory tree as JSON.
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let config = ReportConfig {
        profile: args.profile,
        out_dir: args.out,
        src_root: args.src,
        clean: args.clean,
        json: args.json,
    };

    let summary = cli::cmd_generate(&config)?;
    if !args.quiet {
        print!("{summary}");
    }
    Ok(())
}
