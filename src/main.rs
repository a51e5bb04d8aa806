use std::io::Write;
use std::process::ExitCode;
use clap::{CommandFactory, Parser};
use log::debug;
use mutil::{
    audio::metadata::collect_inputs,
    cli::commands::Cli,
    utils::{
        batch::{BatchRunner, FailurePolicy},
        reporting::Reporter,
    },
    Ffmpeg, Processor, SymphoniaTagReader,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();

    env_logger::Builder::new()
        .filter_level(verbosity.log_filter())
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    let actions = match cli.actions() {
        Some(actions) if !cli.files.is_empty() => actions,
        _ => {
            println!("{}", Cli::command().render_usage());
            return ExitCode::SUCCESS;
        }
    };

    let files = collect_inputs(&cli.files);
    let processor = Processor::new(
        actions,
        Box::new(SymphoniaTagReader),
        Box::new(Ffmpeg::new(cli.ffmpeg.clone(), verbosity)),
    );
    let runner = BatchRunner::new(cli.jobs, cli.failure_policy());
    debug!("processing {} files with {} workers", files.len(), runner.jobs());

    let summary = match runner.run(&files, |path| processor.process(path)) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let reporter = Reporter::new();
    if let Some(report_path) = &cli.report {
        if let Err(e) = reporter.generate_batch_report(&summary, report_path) {
            eprintln!("error writing report: {}", e);
        }
    }

    if cli.failure_policy() == FailurePolicy::KeepGoing || files.len() > 1 {
        reporter.print_summary(&summary);
    }

    if cli.failure_policy() == FailurePolicy::FailFast {
        if let Some(message) = summary.first_error() {
            eprintln!("error: {}", message);
        }
    }

    if summary.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
