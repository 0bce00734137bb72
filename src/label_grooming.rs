/*
cargo run --bin label_grooming

cargo run --bin label_grooming -- \
    --dataset-dir Dataset \
    --out-dir     outputs \
    --summary-json logs/label_summary.json
*/

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::info;
use pasyda_label::pipeline::{Config, RunReport, DEFAULT_DATASET_DIR, DEFAULT_OUT_DIR};
use pasyda_label::{run, ID_COLUMN};
use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, LevelFilter, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

// Label PASYDA victim tables with yes/no grooming labels from their solutions tables
#[derive(Parser, Debug)]
#[command(author, version, about = "Label PASYDA victim CSVs using the matching solutions CSVs")]
struct Args {
    // Folder holding perp_<X>_vic_data.csv and perp_<X>_solutions.csv
    #[arg(long, default_value = DEFAULT_DATASET_DIR)]
    dataset_dir: PathBuf,

    // Where the *_labelled.csv files and all_victims_labelled.csv go
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    // Identifier column shared by both files
    #[arg(long, default_value = ID_COLUMN)]
    id_column: String,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    // Optional JSON dump of the run summary
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn init_logging(log_dir: &Path) -> Result<PathBuf> {
    create_dir_all(log_dir).with_context(|| format!("creating {}", log_dir.display()))?;
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("label_grooming_{ts}.log"));

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Warn,
            LogConfig::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(
            LevelFilter::Info,
            LogConfig::default(),
            File::create(&log_path)
                .with_context(|| format!("creating {}", log_path.display()))?,
        ),
    ])?;

    Ok(log_path)
}

fn print_summary(report: &RunReport, log_path: &Path) {
    println!("\n=== Label summary ===");
    for file in &report.labelled {
        println!(
            "{:<40} rows={:<6} yes={:<6} no={:<6}",
            file.victim.file_name().unwrap_or_default().to_string_lossy(),
            file.rows,
            file.positives,
            file.negatives()
        );
    }
    println!("Pairs labelled     : {}", report.labelled.len());
    println!("Skipped (no sols)  : {}", report.skipped.len());
    println!(
        "Rows total         : {} (yes={}, no={})",
        report.total_rows(),
        report.total_positives(),
        report.total_rows() - report.total_positives()
    );
    println!("Combined CSV       : {}", report.combined.output.display());
    println!("Log file           : {}", log_path.display());
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config {
        dataset_dir: args.dataset_dir,
        out_dir: args.out_dir,
        id_column: args.id_column,
    };
    // no log file for a run that cannot start
    config.validate()?;
    let log_path = init_logging(&args.log_dir)?;
    info!("Starting labelling run: {:?}", config);

    let report = run(&config)?;
    print_summary(&report, &log_path);

    if let Some(path) = &args.summary_json {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Summary written to {}", path.display());
    }

    info!("All done successfully.");
    Ok(())
}
