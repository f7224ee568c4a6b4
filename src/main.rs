/*!
 * Prime Pipeline - Main Entry Point
 *
 * Reads integers from a file, classifies them across worker threads and
 * prints the aggregated statistics.
 */

use clap::Parser;
use miette::IntoDiagnostic;
use tracing::{info, warn};

use prime_pipeline::cli::Args;
use prime_pipeline::report::{aggregates_agree, render_json};
use prime_pipeline::source::collect_values;
use prime_pipeline::{
    init_tracing, is_prime, ComparisonTable, IterSource, Pipeline, TokenReader, TextReport,
};

fn main() -> miette::Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = args.pipeline_config();

    info!(
        file = %args.file.display(),
        threads = config.threads,
        queue = %config.queue,
        aggregation = %config.aggregation,
        mode = %config.mode,
        "Starting prime pipeline"
    );

    let mut source = TokenReader::open(&args.file)?.strict(args.strict);

    if args.compare {
        // Read once so every configuration sees identical input and no file I/O
        let values = collect_values(&mut source)?;
        info!(values = values.len(), "Input loaded for comparison");

        let mut reports = Vec::new();
        for candidate in config.combinations() {
            let pipeline = Pipeline::new(candidate)?;
            reports.push(pipeline.run(IterSource::from(values.iter().copied()), is_prime)?);
        }

        for report in &reports {
            if let Err(warning) = report.consistency() {
                println!("[error]: {}.", warning);
            }
        }
        print!("{}", ComparisonTable(&reports));
        if !aggregates_agree(&reports) {
            warn!("Configurations disagree on aggregate results");
        }
        return Ok(());
    }

    let pipeline = Pipeline::new(config)?;
    let report = pipeline.run(source, is_prime)?;

    if let Err(warning) = report.consistency() {
        println!("[error]: {}.", warning);
    }

    if args.json {
        println!("{}", render_json(&report).into_diagnostic()?);
    } else {
        print!("{}", TextReport::new(&report, args.display_mode()));
    }

    Ok(())
}
