//! Transcript rendering and persistence
//!
//! Each thread becomes one delimited plain-text document:
//!
//! ```text
//! START STACK EXCHANGE QUESTION: ID <questionId>
//! Title: <title>
//! Body: <normalizedBody>
//! OP COMMENT 1: <text>
//! RESPONSE 1: <normalizedBody>
//! RESPONSE 1 COMMENT 1: <text>
//! END STACK EXCHANGE QUESTION: ID <questionId>
//! ```
//!
//! OP comments precede all responses; each response body line precedes that
//! response's comments; numbering is 1-based and contiguous per group.

use crate::normalize::TextNormalizer;
use crate::threads::Thread;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Render one thread into its transcript document.
pub fn render(thread: &Thread, normalizer: &TextNormalizer) -> String {
    let id = &thread.question.id;
    let mut out = String::new();

    out.push_str(&format!("START STACK EXCHANGE QUESTION: ID {id}\n"));
    out.push_str(&format!("Title: {}\n", thread.question.title));
    out.push_str(&format!(
        "Body: {}\n",
        normalizer.normalize(&thread.question.body)
    ));

    for (n, comment) in thread.comments.iter().enumerate() {
        out.push_str(&format!(
            "OP COMMENT {}: {}\n",
            n + 1,
            normalizer.normalize(&comment.text)
        ));
    }

    for (n, answer) in thread.answers.iter().enumerate() {
        out.push_str(&format!(
            "RESPONSE {}: {}\n",
            n + 1,
            normalizer.normalize(&answer.post.body)
        ));
        for (m, comment) in answer.comments.iter().enumerate() {
            out.push_str(&format!(
                "RESPONSE {} COMMENT {}: {}\n",
                n + 1,
                m + 1,
                normalizer.normalize(&comment.text)
            ));
        }
    }

    out.push_str(&format!("END STACK EXCHANGE QUESTION: ID {id}"));
    out
}

/// Writes transcripts into a fixed output directory, one file per question.
pub struct TranscriptWriter {
    dir: PathBuf,
}

impl TranscriptWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist one thread as `Post_<questionId>.txt`.
    ///
    /// The document is written to a temporary sibling and renamed into
    /// place, so an interrupted run never leaves a torn transcript.
    pub fn write(&self, thread: &Thread, normalizer: &TextNormalizer) -> io::Result<PathBuf> {
        let rendered = render(thread, normalizer);
        let file_name = transcript_file_name(&thread.question.id);
        let final_path = self.dir.join(&file_name);
        let tmp_path = self.dir.join(format!(".{file_name}.tmp"));

        fs::write(&tmp_path, rendered.as_bytes())?;
        fs::rename(&tmp_path, &final_path)?;
        Ok(final_path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Deterministic transcript file name for a question id.
pub fn transcript_file_name(question_id: &str) -> String {
    format!("Post_{question_id}.txt")
}
