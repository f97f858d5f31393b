//! Dump table loading
//!
//! Stack Exchange publishes per-site data dumps as compressed archives of
//! flat XML tables. This module reads the two tables the transcript pipeline
//! needs (`Posts.xml`, `Comments.xml`) into ordered, in-memory record
//! sequences.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  extraction directory                │
//! │          Posts.xml            Comments.xml           │
//! └──────────────────────────────────────────────────────┘
//!              │                        │
//!              ▼                        ▼
//!       ┌─────────────┐         ┌──────────────┐
//!       │ TableReader │         │ TableReader  │
//!       │ <posts>     │         │ <comments>   │
//!       │   <row …/>  │         │   <row …/>   │
//!       └─────────────┘         └──────────────┘
//!              │                        │
//!              ▼                        ▼
//!         Vec<Post>               Vec<Comment>
//! ```
//!
//! Row order is preserved end to end; the dumps are chronologically ordered
//! and thread assembly depends on that ordering staying intact.

pub mod source;
pub mod table;

pub use source::{Comment, DumpError, Post, PostType};
pub use table::{find_table_file, load_comments, load_posts, RowAttrs, TableReader};
