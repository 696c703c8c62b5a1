mod commands;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "quizdig",
    version,
    about = "Reconstruct multiple-choice questions from positional HTML exports"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct questions and answers from an HTML export
    Extract {
        /// Path to the HTML export
        input_file: PathBuf,

        /// Dataset file to write
        #[arg(short = 'O', long = "out", value_name = "FILE", default_value = "questions.json")]
        out: PathBuf,

        /// Predefined extraction profile (default: pdf24)
        #[arg(short, long, value_name = "NAME", conflicts_with = "profile")]
        preset: Option<String>,

        /// Custom JSON profile file
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        /// Summary format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Rebuild question text from a transcript, keeping extracted answers
    Merge {
        /// Path to the plain-text transcript
        transcript: PathBuf,

        /// Dataset file to read and overwrite
        #[arg(short, long, value_name = "FILE", default_value = "questions.json")]
        dataset: PathBuf,
    },
    /// Cross-check the dataset against the transcript
    Verify {
        /// Path to the plain-text transcript
        transcript: PathBuf,

        /// Dataset file to check
        #[arg(short, long, value_name = "FILE", default_value = "questions.json")]
        dataset: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show every content warning instead of the first few
        #[arg(long)]
        all_warnings: bool,
    },
    /// Show where fragments sit horizontally, to help tune a profile
    Layout {
        /// Path to the HTML export
        input_file: PathBuf,

        /// Predefined extraction profile (default: pdf24)
        #[arg(short, long, value_name = "NAME", conflicts_with = "profile")]
        preset: Option<String>,

        /// Custom JSON profile file
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,
    },
    /// Manage and inspect extraction profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List predefined profiles
    List,
    /// Print a predefined profile as JSON
    Show {
        /// Preset name (e.g., "pdf24")
        preset: String,
    },
    /// Validate a custom profile file
    Validate {
        /// Path to JSON profile file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            input_file,
            out,
            preset,
            profile,
            output,
        } => commands::extract::run(input_file, out, preset, profile, &output),
        Commands::Merge {
            transcript,
            dataset,
        } => commands::merge::run(transcript, dataset),
        Commands::Verify {
            transcript,
            dataset,
            output,
            all_warnings,
        } => commands::verify::run(transcript, dataset, &output, all_warnings),
        Commands::Layout {
            input_file,
            preset,
            profile,
        } => commands::layout::run(input_file, preset, profile),
        Commands::Profile { action } => match action {
            ProfileAction::List => commands::profile::list(),
            ProfileAction::Show { preset } => commands::profile::show(&preset),
            ProfileAction::Validate { file } => commands::profile::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
