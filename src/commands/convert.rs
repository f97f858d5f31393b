use anyhow::{Context, Result};
use sevoice::config::Config;
use sevoice::extract::SevenZipExtractor;
use sevoice::pipeline::{ConvertError, Converter, RunContext};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::{error, info};

/// Exit code for a failed archive extraction.
const EXIT_EXTRACTION: i32 = 2;
/// Exit code for malformed or missing dump tables.
const EXIT_MALFORMED: i32 = 3;

pub async fn run(
    config: Config,
    archive: PathBuf,
    seven_zip: Option<PathBuf>,
    output: Option<PathBuf>,
    max_questions: Option<usize>,
    quiet: bool,
) -> Result<()> {
    if !archive.exists() {
        anyhow::bail!("Archive not found: {}", archive.display());
    }

    let tool = seven_zip.unwrap_or_else(|| config.extraction.seven_zip.clone());
    let base_dir = output.unwrap_or_else(|| config.output.base_dir.clone());

    let ctx = RunContext::create(&base_dir)
        .with_context(|| format!("Failed to create run directory under {}", base_dir.display()))?;
    info!("Run directory: {}", ctx.run_dir.display());

    let converter = Converter::new(
        Box::new(SevenZipExtractor::new(tool)),
        config.normalize.normalizer(),
    )
    .with_max_questions(max_questions)
    .with_quiet(quiet);

    // Ctrl-C stops the run cleanly between threads; per-file atomic writes
    // mean whatever was already written stays valid.
    let cancel = converter.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, finishing current question");
            cancel.store(true, Ordering::Relaxed);
        }
    });

    let transcript_dir = ctx.transcript_dir.clone();
    let result =
        tokio::task::spawn_blocking(move || converter.convert(&archive, &ctx)).await?;

    match result {
        Ok(stats) => {
            if !quiet {
                println!("\nConversion Complete!");
                println!("====================");
                println!("Questions processed: {}", stats.questions_processed);
                println!("Transcripts written: {}", stats.transcripts_written);
                println!("Threads failed:      {}", stats.threads_failed);
                println!("Responses emitted:   {}", stats.answers_emitted);
                println!("Comments emitted:    {}", stats.comments_emitted);
                println!("Elapsed time:        {:.1}s", stats.elapsed_seconds);
                println!("Processing rate:     {:.1} questions/s", stats.threads_per_second);
                println!("\nTranscripts saved to: {}", transcript_dir.display());
            }
            Ok(())
        }
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            let code = match e {
                ConvertError::Extraction(_) => EXIT_EXTRACTION,
                ConvertError::Dump(_) => EXIT_MALFORMED,
                ConvertError::Io(_) => 1,
            };
            std::process::exit(code);
        }
    }
}
