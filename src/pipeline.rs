//! Conversion pipeline orchestration
//!
//! One run: extract the archive into a fresh run directory, load the Posts
//! and Comments tables, assemble question threads, write one transcript per
//! question. Extraction and load failures abort the run; a failure inside a
//! single thread is logged, counted, and skipped so one bad row cannot sink
//! a batch of hundreds of thousands.

use crate::dump::{self, DumpError};
use crate::extract::{ArchiveExtractor, ExtractionError};
use crate::normalize::TextNormalizer;
use crate::progress::{ConvertProgress, ConvertStats};
use crate::threads::ThreadAssembler;
use crate::transcript::TranscriptWriter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Name of the transcripts subdirectory inside a run directory.
pub const TRANSCRIPT_DIR_NAME: &str = "Transcripts";

/// Fatal pipeline errors. Per-thread failures are not represented here;
/// they are isolated and surface only in the run statistics.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("dump parsing failed: {0}")]
    Dump(#[from] DumpError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Per-run paths, constructed once and passed to each stage.
///
/// The archive is extracted into the run directory itself; transcripts land
/// in a subdirectory beside the extracted tables. The timestamp in the name
/// keeps successive runs from overwriting each other and records when the
/// dump was converted.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_dir: PathBuf,
    pub transcript_dir: PathBuf,
}

impl RunContext {
    /// Create a fresh timestamped run directory under `base_dir`.
    pub fn create(base_dir: &Path) -> io::Result<Self> {
        let timestamp = chrono::Local::now().format("%Y_%m_%d__%H_%M_%S");
        let run_dir = base_dir.join(format!("Stack_Exchange_Transcript_Output_{timestamp}"));
        Self::at(run_dir)
    }

    /// Use `run_dir` as the run directory, creating it and the transcripts
    /// subdirectory.
    pub fn at(run_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let run_dir = run_dir.into();
        fs::create_dir_all(&run_dir)?;
        let transcript_dir = run_dir.join(TRANSCRIPT_DIR_NAME);
        fs::create_dir_all(&transcript_dir)?;
        Ok(Self {
            run_dir,
            transcript_dir,
        })
    }
}

/// Orchestrates one conversion run.
pub struct Converter {
    extractor: Box<dyn ArchiveExtractor>,
    normalizer: TextNormalizer,
    max_questions: Option<usize>,
    quiet: bool,
    cancel: Arc<AtomicBool>,
}

impl Converter {
    pub fn new(extractor: Box<dyn ArchiveExtractor>, normalizer: TextNormalizer) -> Self {
        Self {
            extractor,
            normalizer,
            max_questions: None,
            quiet: false,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop after this many questions (None = all).
    pub fn with_max_questions(mut self, max: Option<usize>) -> Self {
        self.max_questions = max;
        self
    }

    /// Suppress the progress bar.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Share a cancellation flag; setting it stops the run cleanly between
    /// threads.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle to this converter's cancellation flag.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Run the full pipeline for one archive.
    pub fn convert(&self, archive: &Path, ctx: &RunContext) -> Result<ConvertStats, ConvertError> {
        info!("Extracting {} (stage: extraction)", archive.display());
        self.extractor.extract(archive, &ctx.run_dir)?;
        info!("Finished extracting archive");

        info!("Parsing dump tables (stage: parsing)");
        let posts_path = dump::find_table_file(&ctx.run_dir, "Posts.xml")?;
        let comments_path = dump::find_table_file(&ctx.run_dir, "Comments.xml")?;

        let posts = dump::load_posts(&posts_path)?;
        let comments = dump::load_comments(&comments_path)?;
        info!("Loaded {} posts and {} comments", posts.len(), comments.len());

        let assembler = ThreadAssembler::new(posts, comments);
        let total = assembler.question_count();
        info!("Assembled index for {} questions", total);

        let progress = ConvertProgress::new(total as u64, self.quiet);
        let writer = TranscriptWriter::new(&ctx.transcript_dir);

        let mut written = 0usize;
        for thread in assembler.threads() {
            if self.cancel.load(Ordering::Relaxed) {
                progress.cancel();
                info!("Conversion cancelled after {} questions", written);
                break;
            }

            if let Some(max) = self.max_questions {
                if written >= max {
                    info!("Reached max questions limit: {}", max);
                    break;
                }
            }

            let question_id = thread.question.id.clone();
            let answers = thread.answers.len();
            let comments = thread.comments.len()
                + thread
                    .answers
                    .iter()
                    .map(|a| a.comments.len())
                    .sum::<usize>();

            match writer.write(&thread, &self.normalizer) {
                Ok(_) => {
                    progress.thread_written(&question_id, answers, comments);
                    written += 1;
                }
                Err(e) => {
                    warn!("Failed to write thread {question_id}: {e} (stage: thread)");
                    progress.thread_failed();
                }
            }
        }

        progress.finish();
        Ok(progress.get_stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTS_XML: &str = r#"<posts>
  <row Id="10" PostTypeId="1" Title="T" Body="&lt;p&gt;Hi&lt;/p&gt;" />
  <row Id="11" PostTypeId="2" ParentId="10" Body="&lt;b&gt;Ans&lt;/b&gt;" />
</posts>"#;

    const COMMENTS_XML: &str = r#"<comments>
  <row Id="1" PostId="10" Text="nice" />
  <row Id="2" PostId="11" Text="thanks" />
</comments>"#;

    /// Fake collaborator that materializes fixture tables instead of
    /// running a real decompression tool.
    struct FixtureExtractor {
        posts: String,
        comments: Option<String>,
    }

    impl FixtureExtractor {
        fn new(posts: &str, comments: Option<&str>) -> Self {
            Self {
                posts: posts.to_string(),
                comments: comments.map(|c| c.to_string()),
            }
        }
    }

    impl ArchiveExtractor for FixtureExtractor {
        fn extract(&self, _archive: &Path, dest: &Path) -> Result<(), ExtractionError> {
            fs::write(dest.join("Posts.xml"), &self.posts)?;
            if let Some(ref comments) = self.comments {
                fs::write(dest.join("Comments.xml"), comments)?;
            }
            Ok(())
        }
    }

    struct FailingExtractor;

    impl ArchiveExtractor for FailingExtractor {
        fn extract(&self, archive: &Path, _dest: &Path) -> Result<(), ExtractionError> {
            Err(ExtractionError::Failed {
                status: "exit status: 2".to_string(),
                archive: archive.display().to_string(),
            })
        }
    }

    fn quiet_converter(extractor: Box<dyn ArchiveExtractor>) -> Converter {
        Converter::new(extractor, TextNormalizer::default()).with_quiet(true)
    }

    #[test]
    fn test_run_context_layout() {
        let base = tempfile::TempDir::new().unwrap();
        let ctx = RunContext::at(base.path().join("run")).unwrap();
        assert!(ctx.run_dir.is_dir());
        assert!(ctx.transcript_dir.is_dir());
        assert!(ctx.transcript_dir.ends_with("Transcripts"));
    }

    #[test]
    fn test_convert_writes_transcripts() {
        let base = tempfile::TempDir::new().unwrap();
        let ctx = RunContext::at(base.path().join("run")).unwrap();
        let converter = quiet_converter(Box::new(FixtureExtractor::new(POSTS_XML, Some(COMMENTS_XML))));

        let stats = converter.convert(Path::new("dump.7z"), &ctx).unwrap();
        assert_eq!(stats.transcripts_written, 1);
        assert_eq!(stats.threads_failed, 0);
        assert_eq!(stats.answers_emitted, 1);
        assert_eq!(stats.comments_emitted, 2);

        let doc = fs::read_to_string(ctx.transcript_dir.join("Post_10.txt")).unwrap();
        assert!(doc.contains("Title: T"));
        assert!(doc.contains("Body: Hi"));
        assert!(doc.contains("OP COMMENT 1: nice"));
        assert!(doc.contains("RESPONSE 1: Ans"));
        assert!(doc.contains("RESPONSE 1 COMMENT 1: thanks"));
    }

    #[test]
    fn test_extraction_failure_is_fatal() {
        let base = tempfile::TempDir::new().unwrap();
        let ctx = RunContext::at(base.path().join("run")).unwrap();
        let converter = quiet_converter(Box::new(FailingExtractor));

        let err = converter.convert(Path::new("dump.7z"), &ctx).unwrap_err();
        assert!(matches!(err, ConvertError::Extraction(_)));
    }

    #[test]
    fn test_missing_comments_table_is_fatal() {
        let base = tempfile::TempDir::new().unwrap();
        let ctx = RunContext::at(base.path().join("run")).unwrap();
        let converter = quiet_converter(Box::new(FixtureExtractor::new(POSTS_XML, None)));

        let err = converter.convert(Path::new("dump.7z"), &ctx).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Dump(DumpError::TableNotFound { .. })
        ));
    }

    #[test]
    fn test_pre_set_cancel_flag_writes_nothing() {
        let base = tempfile::TempDir::new().unwrap();
        let ctx = RunContext::at(base.path().join("run")).unwrap();
        let converter = quiet_converter(Box::new(FixtureExtractor::new(POSTS_XML, Some(COMMENTS_XML))));
        converter.cancel_flag().store(true, Ordering::Relaxed);

        let stats = converter.convert(Path::new("dump.7z"), &ctx).unwrap();
        assert_eq!(stats.transcripts_written, 0);
        assert!(!ctx.transcript_dir.join("Post_10.txt").exists());
    }

    #[test]
    fn test_max_questions_limits_output() {
        let posts = r#"<posts>
  <row Id="10" PostTypeId="1" Title="A" Body="a" />
  <row Id="20" PostTypeId="1" Title="B" Body="b" />
  <row Id="30" PostTypeId="1" Title="C" Body="c" />
</posts>"#;
        let base = tempfile::TempDir::new().unwrap();
        let ctx = RunContext::at(base.path().join("run")).unwrap();
        let converter = quiet_converter(Box::new(FixtureExtractor::new(
            posts,
            Some("<comments></comments>"),
        )))
        .with_max_questions(Some(2));

        let stats = converter.convert(Path::new("dump.7z"), &ctx).unwrap();
        assert_eq!(stats.transcripts_written, 2);
        assert!(ctx.transcript_dir.join("Post_10.txt").exists());
        assert!(ctx.transcript_dir.join("Post_20.txt").exists());
        assert!(!ctx.transcript_dir.join("Post_30.txt").exists());
    }

    #[test]
    fn test_question_without_replies_produces_document() {
        let posts = r#"<posts><row Id="99" PostTypeId="1" Title="Alone" Body="solo" /></posts>"#;
        let base = tempfile::TempDir::new().unwrap();
        let ctx = RunContext::at(base.path().join("run")).unwrap();
        let converter = quiet_converter(Box::new(FixtureExtractor::new(
            posts,
            Some("<comments></comments>"),
        )));

        let stats = converter.convert(Path::new("dump.7z"), &ctx).unwrap();
        assert_eq!(stats.transcripts_written, 1);

        let doc = fs::read_to_string(ctx.transcript_dir.join("Post_99.txt")).unwrap();
        assert!(doc.starts_with("START STACK EXCHANGE QUESTION: ID 99"));
        assert!(doc.ends_with("END STACK EXCHANGE QUESTION: ID 99"));
        assert!(!doc.contains("OP COMMENT"));
        assert!(!doc.contains("RESPONSE"));
    }
}
