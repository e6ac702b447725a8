use clap::Parser;
use latency_report::{AnalysisConfig, DuplicatePolicy, PngRenderer};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "latency-report")]
#[command(about = "Analyze latency measurements and write a Markdown report")]
struct Args {
    /// Directory holding `<datatype>_el<N>_par<M>.txt` sample files.
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Where to write plots and report.md. Defaults to `report` next to DIR.
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,

    /// Abort on the first malformed sample file instead of skipping it.
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// What to do when two files describe the same configuration.
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::Overwrite)]
    on_duplicate: DuplicatePolicy,

    /// Analyze files one at a time instead of on the thread pool.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Also print the JSON summary to stdout.
    #[arg(long, default_value_t = false)]
    print_summary: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("latency_report=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AnalysisConfig {
        input_dir: args.directory,
        report_dir: args.report_dir,
        strict: args.strict,
        duplicates: args.on_duplicate,
        parallel: !args.sequential,
    };

    let mut renderer = PngRenderer::default();
    match latency_report::run(config, &mut renderer) {
        Ok(outcome) => {
            eprintln!(
                "Wrote {} ({} artifacts, {} results, {} skipped, {} duplicates)",
                outcome.report_path.display(),
                outcome.artifacts.len(),
                outcome.results,
                outcome.skipped,
                outcome.duplicates
            );
            if args.print_summary {
                println!("{}", outcome.summary_json);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "analysis failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
