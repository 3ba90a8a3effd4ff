use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use screener_core::RequirementsProfile;
use screener_core::config_file;
use screener_core::experience::experience_mentions;
use screener_ingest::{StagingArea, Upload, extract_upload_text, read_inputs};
use screener_reporting::{
    ExportFormat, ProgressEvent, build_report, export_results, read_report, screen_text,
};

mod output;
mod settings;

use output::ColorMode;
use settings::{Overrides, Settings};

/// Résumé screener - score candidate résumés against a requirements profile
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Less output: hide the progress bar and all but errors (-qq silences logs)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Screen .pdf, .docx and .txt résumés (or .zip/.tar.gz archives of them)
    Screen {
        /// Résumé files or archives to screen
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Requirements profile (.json or .toml)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Require must_have, good_to_have, min_years_experience and education_level in the profile
        #[arg(long)]
        strict: bool,

        /// Report file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format: csv, json, markdown or text (default: from --output extension, else csv)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Total size limit for files expanded from each archive, in MB (0 = unlimited)
        #[arg(long)]
        max_archive_mb: Option<u32>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Load a requirements profile and print it with defaults filled in
    Profile {
        /// Requirements profile (.json or .toml)
        file: Option<PathBuf>,

        /// Apply the strict schema
        #[arg(long)]
        strict: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Dry run: show everything derived from one résumé without writing a report
    Inspect {
        /// Résumé file (.pdf, .docx or .txt)
        file: PathBuf,

        /// Requirements profile (.json or .toml)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Apply the strict schema
        #[arg(long)]
        strict: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Display a previously exported CSV report
    Show {
        /// CSV report written by `screen`
        report: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the effective tool settings as TOML
    Config {
        /// Also write them to the platform config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = config_file::load_config();
    let quiet = cli.quiet > 0;

    match cli.command {
        Command::Screen {
            files,
            profile,
            strict,
            output,
            format,
            max_archive_mb,
            no_color,
        } => {
            let settings = Settings::resolve(
                &config,
                Overrides {
                    profile,
                    strict,
                    output,
                    format,
                    max_archive_mb,
                    no_color,
                },
            )?;
            screen(&files, &settings, quiet)
        }
        Command::Profile {
            file,
            strict,
            no_color,
        } => {
            let settings = Settings::resolve(
                &config,
                Overrides {
                    profile: file,
                    strict,
                    no_color,
                    ..Default::default()
                },
            )?;
            let profile = load_profile(&settings)?;
            let mut stdout = std::io::stdout();
            output::print_profile(
                &mut stdout,
                &settings.profile_path.display().to_string(),
                &profile,
                color_mode(&settings),
            )
        }
        Command::Inspect {
            file,
            profile,
            strict,
            no_color,
        } => {
            let settings = Settings::resolve(
                &config,
                Overrides {
                    profile,
                    strict,
                    no_color,
                    ..Default::default()
                },
            )?;
            inspect(&file, &settings)
        }
        Command::Show { report, no_color } => {
            let settings = Settings::resolve(
                &config,
                Overrides {
                    no_color,
                    ..Default::default()
                },
            )?;
            show(&report, color_mode(&settings))
        }
        Command::Config { save } => {
            let settings = Settings::resolve(&config, Overrides::default())?;
            let effective = settings.to_config();
            print!("{}", toml::to_string_pretty(&effective)?);
            if save {
                let path = config_file::save_config(&effective).map_err(anyhow::Error::msg)?;
                eprintln!("Saved settings to {}", path.display());
            }
            Ok(())
        }
    }
}

/// Map `-v`/`-q` counts to a log filter; logs go to stderr so stdout carries
/// only the report.
fn log_filter(verbose: u8, quiet: u8) -> &'static str {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => "off",
        -1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    let filter = tracing_subscriber::EnvFilter::new(log_filter(verbose, quiet));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn color_mode(settings: &Settings) -> ColorMode {
    ColorMode(settings.color && std::io::stdout().is_terminal())
}

fn load_profile(settings: &Settings) -> anyhow::Result<RequirementsProfile> {
    RequirementsProfile::load(&settings.profile_path, settings.schema).with_context(|| {
        format!(
            "failed to load requirements profile {}",
            settings.profile_path.display()
        )
    })
}

fn screen(files: &[PathBuf], settings: &Settings, quiet: bool) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let color = color_mode(settings);
    let profile = load_profile(settings)?;

    let batch = read_inputs(files, settings.max_archive_bytes);
    let mut stderr = std::io::stderr();
    output::print_warnings(&mut stderr, &batch.warnings, color)?;
    if batch.uploads.is_empty() {
        anyhow::bail!("No résumés to screen");
    }

    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(batch.uploads.len() as u64)
    };
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.green/dim}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let rows = build_report(&batch.uploads, &profile, |event| match event {
        ProgressEvent::Screening { filename, .. } => bar.set_message(filename.to_string()),
        ProgressEvent::Screened { .. } => bar.inc(1),
    })
    .context("failed to screen batch")?;
    bar.finish_and_clear();

    let mut stdout = std::io::stdout();
    output::print_report(&mut stdout, &rows, color)?;
    output::print_summary(&mut stdout, &rows, color)?;

    export_results(&rows, settings.format, &settings.output_path).with_context(|| {
        format!(
            "failed to write report to {}",
            settings.output_path.display()
        )
    })?;
    writeln!(
        stdout,
        "{} report written to {}",
        settings.format,
        settings.output_path.display()
    )?;
    Ok(())
}

fn inspect(file: &Path, settings: &Settings) -> anyhow::Result<()> {
    let color = color_mode(settings);
    let profile = load_profile(settings)?;

    let upload =
        Upload::from_path(file).with_context(|| format!("failed to read {}", file.display()))?;
    let staging = StagingArea::new().context("failed to create staging directory")?;
    let text = extract_upload_text(&staging, 0, &upload);
    let mentions = experience_mentions(&text);
    let row = screen_text(&upload.filename, &text, &profile);

    let inspection = output::Inspection {
        filename: &upload.filename,
        kind: upload.kind(),
        text_chars: text.chars().count(),
        experience_mentions: &mentions,
        row: &row,
    };
    let mut stdout = std::io::stdout();
    output::print_inspection(&mut stdout, &inspection, color)?;
    Ok(())
}

fn show(report: &Path, color: ColorMode) -> anyhow::Result<()> {
    let rows = read_report(report)
        .with_context(|| format!("failed to read report {}", report.display()))?;
    let mut stdout = std::io::stdout();
    output::print_report(&mut stdout, &rows, color)?;
    output::print_summary(&mut stdout, &rows, color)?;
    Ok(())
}
