use anyhow::Result;
use serde::Serialize;
use sevoice::dump::{self, PostType};
use sevoice::threads::ThreadAssembler;
use std::path::PathBuf;

/// Counts reported for an extracted dump directory.
#[derive(Serialize)]
struct InspectReport {
    posts: usize,
    comments: usize,
    questions: usize,
    answers: usize,
    other_posts: usize,
}

pub async fn run(dir: PathBuf, format: String) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let posts_path = dump::find_table_file(&dir, "Posts.xml")?;
    let comments_path = dump::find_table_file(&dir, "Comments.xml")?;

    let posts = dump::load_posts(&posts_path)?;
    let comments = dump::load_comments(&comments_path)?;

    let questions = posts
        .iter()
        .filter(|p| p.post_type == PostType::Question)
        .count();
    let answers = posts
        .iter()
        .filter(|p| p.post_type == PostType::Answer)
        .count();
    let other_posts = posts.len() - questions - answers;

    let report = InspectReport {
        posts: posts.len(),
        comments: comments.len(),
        questions,
        answers,
        other_posts,
    };

    // Sanity check the index path as well; a mismatch here would mean
    // unattachable answers.
    let assembler = ThreadAssembler::new(posts, comments);
    debug_assert_eq!(assembler.question_count(), report.questions);

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("\nDump Statistics");
            println!("===============");
            println!("Posts:       {}", report.posts);
            println!("  Questions: {}", report.questions);
            println!("  Answers:   {}", report.answers);
            println!("  Other:     {}", report.other_posts);
            println!("Comments:    {}", report.comments);
        }
    }

    Ok(())
}
