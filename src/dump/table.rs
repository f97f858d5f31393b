//! Streaming reader for dump table XML files
//!
//! Stack Exchange dump tables share one shape: a single root element named
//! after the table (`<posts>`, `<comments>`) wrapping an ordered run of
//! `<row .../>` elements whose fields are XML attributes. The reader checks
//! the root, then yields each row's attributes in document order.

use super::source::{Comment, DumpError, Post, PostType};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Attribute map of one `<row>` element, values unescaped.
pub type RowAttrs = HashMap<String, String>;

/// Streaming reader over one dump table file.
pub struct TableReader {
    reader: Reader<BufReader<File>>,
    file: String,
    expected_root: String,
    root_seen: bool,
    done: bool,
}

impl TableReader {
    /// Open a table file, expecting `root` as the wrapping element name.
    pub fn open(path: impl AsRef<Path>, root: &str) -> Result<Self, DumpError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let buf_reader = BufReader::with_capacity(1024 * 1024, file);
        let reader = Reader::from_reader(buf_reader);

        Ok(Self {
            reader,
            file: path.display().to_string(),
            expected_root: root.to_string(),
            root_seen: false,
            done: false,
        })
    }

    /// Read the next row, or `None` at end of table.
    fn next_row(&mut self) -> Result<Option<RowAttrs>, DumpError> {
        let mut buf = Vec::with_capacity(8192);

        loop {
            buf.clear();
            let event = self
                .reader
                .read_event_into(&mut buf)
                .map_err(|e| DumpError::XmlParse {
                    file: self.file.clone(),
                    message: e.to_string(),
                })?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                    if !self.root_seen {
                        if name != self.expected_root {
                            return Err(DumpError::MissingRoot {
                                file: self.file.clone(),
                                expected: self.expected_root.clone(),
                                found: name,
                            });
                        }
                        self.root_seen = true;
                        // A self-closing root is an empty (valid) table.
                        if matches!(event, Event::Empty(_)) {
                            self.done = true;
                            return Ok(None);
                        }
                        continue;
                    }

                    if name == "row" {
                        return Ok(Some(self.collect_attrs(e)?));
                    }
                    // Unknown elements inside the table are skipped, matching
                    // the tolerant handling of real-world dump irregularities.
                }
                Event::Eof => {
                    if !self.root_seen {
                        return Err(DumpError::MissingRoot {
                            file: self.file.clone(),
                            expected: self.expected_root.clone(),
                            found: "(empty document)".to_string(),
                        });
                    }
                    self.done = true;
                    return Ok(None);
                }
                _ => {}
            }
        }
    }

    fn collect_attrs(&self, e: &BytesStart<'_>) -> Result<RowAttrs, DumpError> {
        let mut attrs = RowAttrs::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|e| DumpError::XmlParse {
                file: self.file.clone(),
                message: e.to_string(),
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| DumpError::XmlParse {
                    file: self.file.clone(),
                    message: e.to_string(),
                })?
                .into_owned();
            attrs.insert(key, value);
        }
        Ok(attrs)
    }

    /// Iterate remaining rows.
    pub fn rows(&mut self) -> Rows<'_> {
        Rows { reader: self }
    }
}

/// Iterator over table rows in document order.
pub struct Rows<'a> {
    reader: &'a mut TableReader,
}

impl<'a> Iterator for Rows<'a> {
    type Item = Result<RowAttrs, DumpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reader.done {
            return None;
        }
        match self.reader.next_row() {
            Ok(row) => row.map(Ok),
            Err(e) => {
                self.reader.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Load the Posts table, preserving row order.
pub fn load_posts(path: impl AsRef<Path>) -> Result<Vec<Post>, DumpError> {
    let mut reader = TableReader::open(path, "posts")?;
    let mut posts = Vec::new();

    for row in reader.rows() {
        let mut row = row?;
        posts.push(Post {
            id: row.remove("Id").unwrap_or_default(),
            post_type: PostType::from_attr(row.get("PostTypeId").map_or("", |s| s.as_str())),
            parent_id: row.remove("ParentId"),
            title: row.remove("Title").unwrap_or_default(),
            body: row.remove("Body").unwrap_or_default(),
        });
    }

    Ok(posts)
}

/// Load the Comments table, preserving row order.
pub fn load_comments(path: impl AsRef<Path>) -> Result<Vec<Comment>, DumpError> {
    let mut reader = TableReader::open(path, "comments")?;
    let mut comments = Vec::new();

    for row in reader.rows() {
        let mut row = row?;
        comments.push(Comment {
            post_id: row.remove("PostId").unwrap_or_default(),
            text: row.remove("Text").unwrap_or_default(),
        });
    }

    Ok(comments)
}

/// Locate a table file under an extraction directory.
///
/// Dumps normally place `Posts.xml` and `Comments.xml` at the archive root,
/// but some exports nest them one level down, so walk the tree.
pub fn find_table_file(dir: &Path, name: &str) -> Result<PathBuf, DumpError> {
    for entry in walkdir::WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && entry.file_name().to_string_lossy() == name {
            return Ok(entry.path().to_path_buf());
        }
    }

    Err(DumpError::TableNotFound {
        name: name.to_string(),
        dir: dir.display().to_string(),
    })
}
