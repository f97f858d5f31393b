//! Progress tracking for a conversion run

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

/// Summary statistics for one conversion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvertStats {
    /// Questions seen by the writer loop.
    pub questions_processed: usize,
    /// Transcript files persisted.
    pub transcripts_written: usize,
    /// Threads that failed to render or write and were skipped.
    pub threads_failed: usize,
    /// Responses emitted across all transcripts.
    pub answers_emitted: usize,
    /// Comments emitted across all transcripts.
    pub comments_emitted: usize,
    /// Wall-clock time in seconds.
    pub elapsed_seconds: f64,
    /// Questions per second.
    pub threads_per_second: f64,
}

impl ConvertStats {
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.threads_per_second = self.questions_processed as f64 / self.elapsed_seconds;
        }
    }
}

/// Progress tracker for the transcript writer loop.
///
/// Counters are atomic so cancellation and stats reads need no locking.
pub struct ConvertProgress {
    /// Progress bar (None in quiet mode).
    progress_bar: Option<ProgressBar>,
    start_time: Instant,
    questions_processed: AtomicUsize,
    transcripts_written: AtomicUsize,
    threads_failed: AtomicUsize,
    answers_emitted: AtomicUsize,
    comments_emitted: AtomicUsize,
    cancelled: AtomicBool,
}

impl ConvertProgress {
    pub fn new(total_questions: u64, quiet: bool) -> Self {
        let progress_bar = if !quiet {
            let pb = ProgressBar::new(total_questions);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        Self {
            progress_bar,
            start_time: Instant::now(),
            questions_processed: AtomicUsize::new(0),
            transcripts_written: AtomicUsize::new(0),
            threads_failed: AtomicUsize::new(0),
            answers_emitted: AtomicUsize::new(0),
            comments_emitted: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Record one written transcript.
    pub fn thread_written(&self, question_id: &str, answers: usize, comments: usize) {
        let processed = self.questions_processed.fetch_add(1, Ordering::Relaxed) + 1;
        self.transcripts_written.fetch_add(1, Ordering::Relaxed);
        self.answers_emitted.fetch_add(answers, Ordering::Relaxed);
        self.comments_emitted.fetch_add(comments, Ordering::Relaxed);

        if let Some(ref pb) = self.progress_bar {
            pb.set_position(processed as u64);

            let elapsed = self.start_time.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 {
                processed as f64 / elapsed
            } else {
                0.0
            };
            pb.set_message(format!("{rate:.1} q/s | Q {question_id}"));
        }
    }

    /// Record one failed thread (logged by the caller, batch continues).
    pub fn thread_failed(&self) {
        self.questions_processed.fetch_add(1, Ordering::Relaxed);
        self.threads_failed.fetch_add(1, Ordering::Relaxed);
        if let Some(ref pb) = self.progress_bar {
            pb.set_position(self.questions_processed.load(Ordering::Relaxed) as u64);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Request a clean stop between threads.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
        if let Some(ref pb) = self.progress_bar {
            pb.abandon_with_message("Cancelled");
        }
    }

    pub fn get_stats(&self) -> ConvertStats {
        let mut stats = ConvertStats {
            questions_processed: self.questions_processed.load(Ordering::Relaxed),
            transcripts_written: self.transcripts_written.load(Ordering::Relaxed),
            threads_failed: self.threads_failed.load(Ordering::Relaxed),
            answers_emitted: self.answers_emitted.load(Ordering::Relaxed),
            comments_emitted: self.comments_emitted.load(Ordering::Relaxed),
            elapsed_seconds: self.start_time.elapsed().as_secs_f64(),
            threads_per_second: 0.0,
        };
        stats.update_rate();
        stats
    }

    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            let stats = self.get_stats();
            pb.finish_with_message(format!(
                "Done! {} written, {} failed, {:.1} q/s",
                stats.transcripts_written, stats.threads_failed, stats.threads_per_second
            ));
        }
    }

    pub fn print_summary(&self) {
        let stats = self.get_stats();

        println!("\nConversion Summary");
        println!("==================");
        println!("Questions processed: {}", stats.questions_processed);
        println!("Transcripts written: {}", stats.transcripts_written);
        println!("Threads failed:      {}", stats.threads_failed);
        println!("Responses emitted:   {}", stats.answers_emitted);
        println!("Comments emitted:    {}", stats.comments_emitted);
        println!("Elapsed time:        {:.1}s", stats.elapsed_seconds);
        println!("Processing rate:     {:.1} questions/s", stats.threads_per_second);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counters() {
        let progress = ConvertProgress::new(3, true);

        progress.thread_written("10", 2, 5);
        progress.thread_written("20", 0, 0);
        progress.thread_failed();

        let stats = progress.get_stats();
        assert_eq!(stats.questions_processed, 3);
        assert_eq!(stats.transcripts_written, 2);
        assert_eq!(stats.threads_failed, 1);
        assert_eq!(stats.answers_emitted, 2);
        assert_eq!(stats.comments_emitted, 5);
    }

    #[test]
    fn test_cancellation_flag() {
        let progress = ConvertProgress::new(0, true);
        assert!(!progress.is_cancelled());
        progress.cancel();
        assert!(progress.is_cancelled());
    }
}
