//! Question thread reconstruction
//!
//! Groups the flat Posts and Comments tables into per-question threads: the
//! question, its comments, and its answers each with their own comments.
//! Grouping order always equals original table order.

use crate::dump::{Comment, Post, PostType};
use std::collections::HashMap;

/// An answer post with its comments, in Comments-table order.
#[derive(Debug, Clone)]
pub struct Answer {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// One question thread, the unit of transcript output.
#[derive(Debug, Clone)]
pub struct Thread {
    pub question: Post,
    /// Comments on the question itself, in Comments-table order.
    pub comments: Vec<Comment>,
    /// Answers in Posts-table order.
    pub answers: Vec<Answer>,
}

/// Indexes the loaded tables once and yields threads lazily.
///
/// Answers are keyed by `parentId` and comments by `postId` up front, so
/// assembly is linear in table size rather than a full rescan per question.
/// `Vec` values keep insertion order, which is original row order.
pub struct ThreadAssembler {
    questions: Vec<Post>,
    answers_by_parent: HashMap<String, Vec<Post>>,
    comments_by_post: HashMap<String, Vec<Comment>>,
}

impl ThreadAssembler {
    pub fn new(posts: Vec<Post>, comments: Vec<Comment>) -> Self {
        let mut questions = Vec::new();
        let mut answers_by_parent: HashMap<String, Vec<Post>> = HashMap::new();

        for post in posts {
            match post.post_type {
                PostType::Question => questions.push(post),
                PostType::Answer => {
                    if let Some(parent) = post.parent_id.clone() {
                        answers_by_parent.entry(parent).or_default().push(post);
                    }
                    // An answer with no ParentId cannot be attached anywhere;
                    // dropped like any other unattachable row.
                }
                PostType::Other => {}
            }
        }

        let mut comments_by_post: HashMap<String, Vec<Comment>> = HashMap::new();
        for comment in comments {
            comments_by_post
                .entry(comment.post_id.clone())
                .or_default()
                .push(comment);
        }

        Self {
            questions,
            answers_by_parent,
            comments_by_post,
        }
    }

    /// Number of questions that will produce threads.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Consume the assembler, yielding one thread per question in
    /// Posts-table order.
    pub fn threads(self) -> ThreadIter {
        ThreadIter {
            questions: self.questions.into_iter(),
            answers_by_parent: self.answers_by_parent,
            comments_by_post: self.comments_by_post,
        }
    }
}

/// Lazy iterator over assembled threads.
pub struct ThreadIter {
    questions: std::vec::IntoIter<Post>,
    answers_by_parent: HashMap<String, Vec<Post>>,
    comments_by_post: HashMap<String, Vec<Comment>>,
}

impl Iterator for ThreadIter {
    type Item = Thread;

    fn next(&mut self) -> Option<Self::Item> {
        let question = self.questions.next()?;

        let comments = self
            .comments_by_post
            .remove(&question.id)
            .unwrap_or_default();

        let answers = self
            .answers_by_parent
            .remove(&question.id)
            .unwrap_or_default()
            .into_iter()
            .map(|post| {
                let comments = self.comments_by_post.remove(&post.id).unwrap_or_default();
                Answer { post, comments }
            })
            .collect();

        Some(Thread {
            question,
            comments,
            answers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, title: &str) -> Post {
        Post {
            id: id.to_string(),
            post_type: PostType::Question,
            parent_id: None,
            title: title.to_string(),
            body: format!("body of {id}"),
        }
    }

    fn answer(id: &str, parent: &str) -> Post {
        Post {
            id: id.to_string(),
            post_type: PostType::Answer,
            parent_id: Some(parent.to_string()),
            title: String::new(),
            body: format!("answer {id}"),
        }
    }

    fn comment(post_id: &str, text: &str) -> Comment {
        Comment {
            post_id: post_id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_threads_follow_posts_order() {
        let posts = vec![
            question("10", "first"),
            answer("11", "10"),
            question("20", "second"),
            answer("21", "20"),
            answer("12", "10"), // later answer to the first question
        ];
        let assembler = ThreadAssembler::new(posts, vec![]);
        let threads: Vec<_> = assembler.threads().collect();

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].question.id, "10");
        assert_eq!(threads[1].question.id, "20");

        // Answers keep Posts-table order within the thread.
        let ids: Vec<_> = threads[0].answers.iter().map(|a| a.post.id.as_str()).collect();
        assert_eq!(ids, vec!["11", "12"]);
    }

    #[test]
    fn test_comments_attach_to_their_posts_in_order() {
        let posts = vec![question("10", "q"), answer("11", "10")];
        let comments = vec![
            comment("11", "on answer first"),
            comment("10", "on question"),
            comment("11", "on answer second"),
        ];
        let assembler = ThreadAssembler::new(posts, comments);
        let threads: Vec<_> = assembler.threads().collect();

        assert_eq!(threads[0].comments.len(), 1);
        assert_eq!(threads[0].comments[0].text, "on question");

        let answer_comments: Vec<_> = threads[0].answers[0]
            .comments
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(answer_comments, vec!["on answer first", "on answer second"]);
    }

    #[test]
    fn test_bare_question_still_yields_thread() {
        let assembler = ThreadAssembler::new(vec![question("10", "lonely")], vec![]);
        let threads: Vec<_> = assembler.threads().collect();

        assert_eq!(threads.len(), 1);
        assert!(threads[0].comments.is_empty());
        assert!(threads[0].answers.is_empty());
    }

    #[test]
    fn test_other_post_types_are_excluded() {
        let mut wiki = question("30", "");
        wiki.post_type = PostType::Other;

        let assembler = ThreadAssembler::new(vec![wiki, question("10", "q")], vec![]);
        assert_eq!(assembler.question_count(), 1);
        let threads: Vec<_> = assembler.threads().collect();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].question.id, "10");
    }

    #[test]
    fn test_orphan_answer_is_dropped() {
        let mut orphan = answer("99", "10");
        orphan.parent_id = None;

        let assembler = ThreadAssembler::new(vec![question("10", "q"), orphan], vec![]);
        let threads: Vec<_> = assembler.threads().collect();
        assert!(threads[0].answers.is_empty());
    }
}
