use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};

use pb_hd_tools::{run_with_progress, RunEvent, RunOptions};

/// A set of tools to count, filter and mask heteroduplex molecules and bases in PacBio HiFi data
#[derive(Parser, Debug)]
#[command(name = "pb-hd-tools", version)]
struct Args {
    /// Input reads (.bam or .fastq.gz)
    infile: PathBuf,

    /// Output report (.json or .csv)
    outfile: PathBuf,

    /// Also write double stranded reads to <outfile>.fastq (.fastq.gz input only)
    #[arg(short = 'f', long = "filter")]
    filter: bool,

    /// Mask heteroduplex bases (not implemented)
    #[arg(short = 'm', long = "mask")]
    mask: bool,
}

impl From<Args> for RunOptions {
    fn from(args: Args) -> Self {
        RunOptions { infile: args.infile, outfile: args.outfile, filter: args.filter, mask: args.mask }
    }
}

fn spinner_style(color: &str) -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template(&format!("{{spinner:.{color}}} {{msg}}"))
        .context("Invalid spinner template")?)
}

fn spinner(style: &ProgressStyle, msg: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(style.clone());
    spinner.set_message(msg);
    spinner
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let options = RunOptions::from(Args::parse());
    let count_style = spinner_style("green")?;
    let filter_style = spinner_style("yellow")?;

    let mut active: Option<ProgressBar> = None;
    run_with_progress(&options, |event| match event {
        RunEvent::CountStarted { infile } => {
            active = Some(spinner(&count_style, format!("Counting {}...", infile.display())));
        }
        RunEvent::CountFinished { hifi_zmws, other_zmws } => {
            if let Some(spin) = active.take() {
                spin.finish_with_message(format!(
                    "Counted {hifi_zmws} HiFi and {other_zmws} other CCS ZMWs."
                ));
            }
        }
        RunEvent::FilterStarted { .. } => {
            active = Some(spinner(&filter_style, "Filtering single stranded reads...".to_string()));
        }
        RunEvent::FilterFinished { outfile, kept, .. } => {
            if let Some(spin) = active.take() {
                spin.finish_with_message(format!("Wrote {kept} reads to {}.", outfile.display()));
            }
        }
    })
    .with_context(|| format!("pb-hd-tools failed on {}", options.infile.display()))?;

    Ok(())
}
