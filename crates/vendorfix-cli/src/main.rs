mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Args, Command, ManifestSource};
use log::LevelFilter;
use std::io::{self, Write};
use std::process;
use vendorfix_core::{apply_all, ApplyOptions};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let command = args.command.unwrap_or(Command::Apply {
        source: ManifestSource::default(),
        root: None,
        dry_run: false,
    });

    match command {
        Command::Apply {
            source,
            root,
            dry_run,
        } => {
            let descriptors = source.load()?;
            let options = ApplyOptions { root, dry_run };
            apply_all(&descriptors, &options, &mut io::stdout().lock())
                .context("Patching aborted")?;
        }
        Command::Check { source, root } => {
            let descriptors = source.load()?;
            let options = ApplyOptions {
                root,
                dry_run: true,
            };
            let report = apply_all(&descriptors, &options, &mut io::stdout().lock())
                .context("Check aborted")?;
            if !report.fully_patched() {
                println!(
                    "{} of {} fix(es) not yet applied.",
                    report.pending(),
                    report.outcomes.len()
                );
                process::exit(1);
            }
        }
        Command::List { source } => {
            let descriptors = source.load()?;
            let mut out = io::stdout().lock();
            for (i, d) in descriptors.iter().enumerate() {
                writeln!(
                    out,
                    "{:>2}. [{}] {} ({})",
                    i + 1,
                    d.kind,
                    d.description,
                    d.target.display()
                )?;
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}
