//! Core record types and errors for dump table loading

use thiserror::Error;

/// Post type discriminator from the `@PostTypeId` attribute.
///
/// Stack Exchange dumps use a handful of numeric type ids; only questions
/// and answers participate in transcripts, everything else is carried as
/// `Other` and filtered out during thread assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostType {
    Question,
    Answer,
    Other,
}

impl PostType {
    /// Map a raw `@PostTypeId` attribute value.
    pub fn from_attr(value: &str) -> Self {
        match value {
            "1" => PostType::Question,
            "2" => PostType::Answer,
            _ => PostType::Other,
        }
    }
}

/// One row of the Posts table.
///
/// Attribute values are kept as strings; identifiers are only ever compared,
/// never arithmetically used. Optional attributes missing from a row default
/// to empty (`title`, `body`) or `None` (`parent_id`) rather than failing
/// the whole batch.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: String,
    pub post_type: PostType,
    /// Present on answers; references the question's id.
    pub parent_id: Option<String>,
    /// Present on questions.
    pub title: String,
    /// Raw HTML-flavored body text.
    pub body: String,
}

/// One row of the Comments table.
#[derive(Debug, Clone)]
pub struct Comment {
    /// References either a question or an answer id.
    pub post_id: String,
    pub text: String,
}

/// Errors raised while locating and parsing dump tables.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error in {file}: {message}")]
    XmlParse { file: String, message: String },

    #[error("malformed table in {file}: expected root element <{expected}>, found <{found}>")]
    MissingRoot {
        file: String,
        expected: String,
        found: String,
    },

    #[error("table file {name} not found under {dir}")]
    TableNotFound { name: String, dir: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_type_mapping() {
        assert_eq!(PostType::from_attr("1"), PostType::Question);
        assert_eq!(PostType::from_attr("2"), PostType::Answer);
        assert_eq!(PostType::from_attr("3"), PostType::Other);
        assert_eq!(PostType::from_attr(""), PostType::Other);
        assert_eq!(PostType::from_attr("17"), PostType::Other);
    }
}
