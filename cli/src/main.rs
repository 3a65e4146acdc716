mod convert;

#[cfg(test)]
mod test_helpers;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;

use hymnal_backend::{logger, parse_lyrics, LyricFormat};

use convert::{convert, language_table, print_report, ConvertOptions, GitSnapshot};

#[derive(Parser, Debug)]
#[command(author, version, about = "Hymnal converter CLI", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// JSON file with the language table, keyed by input base name.
    /// The built-in English, Luganda and Swahili table is used if not given.
    #[arg(long, global = true, value_name = "FILE")]
    languages: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert the per-language hymn lists into the catalog tree
    Convert {
        /// Directory with the <base>.json hymn lists
        #[arg(long, value_name = "DIRECTORY_PATH", env = "HYMNAL_INPUT_DIR")]
        input_dir: Option<PathBuf>,

        /// Where to write the catalog. An existing directory is moved to a backup first.
        #[arg(long, value_name = "DIRECTORY_PATH", env = "HYMNAL_OUTPUT_DIR", default_value = "hymnals")]
        output_dir: PathBuf,

        /// Read the hymn lists from this git repository instead of --input-dir
        #[arg(long, value_name = "DIRECTORY_PATH")]
        git_repo: Option<PathBuf>,

        /// Revision to read with --git-repo
        #[arg(long, default_value = "HEAD", requires = "git_repo")]
        git_rev: String,

        /// Directory of the hymn lists inside the repository
        #[arg(long, default_value = "", requires = "git_repo")]
        git_path: String,

        /// Convert at most this many hymns per language. Falls back to CONVERT_LIMIT.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Segment one lyric file and print the stanzas as JSON
    #[command(arg_required_else_help = true)]
    Parse {
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Inferred from the file extension if not given
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// List the language table
    Languages,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Html,
    Markdown,
}

impl From<FormatArg> for LyricFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Html => LyricFormat::Html,
            FormatArg::Markdown => LyricFormat::Markdown,
        }
    }
}

fn parse_file(path: &Path, format: Option<FormatArg>) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let format = format.map(LyricFormat::from)
        .unwrap_or_else(|| LyricFormat::from_extension(path.extension().and_then(|e| e.to_str())));

    let stanzas = parse_lyrics(&text, format);
    println!("{}", serde_json::to_string_pretty(&stanzas)?);
    Ok(())
}

fn list_languages(languages: Option<&Path>) -> Result<()> {
    for (base, d) in language_table(languages)? {
        println!("{}: {} ({}) -> {}/", base, d.display_title, d.code, d.directory_name);
    }
    Ok(())
}

fn main() {
    // Attempt to load .env file. This might define HYMNAL_INPUT_DIR and the rest.
    // Clap will pick them up via `env = ...`.
    if dotenv().is_err() {
        println!("Info: No .env file found or failed to load.");
    }

    let cli = Cli::parse();
    logger::init_tracing();

    let command_result = match cli.command {
        Commands::Convert { input_dir, output_dir, git_repo, git_rev, git_path, limit } => {
            let opts = ConvertOptions {
                input_dir,
                output_dir,
                git: git_repo.map(|repo| GitSnapshot { repo, rev: git_rev, path: git_path }),
                languages_file: cli.languages.clone(),
                limit,
            };
            convert(&opts).map(|report| print_report(&report, &opts.output_dir))
        }

        Commands::Parse { path, format } => parse_file(&path, format),

        Commands::Languages => list_languages(cli.languages.as_deref()),
    };

    if let Err(e) = command_result {
        logger::error(&format!("{:#}", e));
        eprintln!("Error executing command: {:#}", e);
        exit(1);
    }
}
