//! Body text normalization for voice readers
//!
//! Forum bodies arrive as HTML-flavored text. A text-to-speech reader
//! stumbles over raw markup, so the highest-frequency offenders are replaced
//! or stripped: anchors and images become fixed spoken placeholders, and a
//! short list of structural tags is removed outright. Everything else passes
//! through untouched; full HTML sanitization is out of scope.

use regex::{NoExpand, Regex};
use std::sync::OnceLock;

static RE_ANCHOR: OnceLock<Regex> = OnceLock::new();
static RE_IMAGE: OnceLock<Regex> = OnceLock::new();

/// Default spoken replacement for an anchor construct.
pub const DEFAULT_LINK_PLACEHOLDER: &str = "SOME HTML LINK";
/// Default spoken replacement for an image construct.
pub const DEFAULT_IMAGE_PLACEHOLDER: &str = "SOME IMAGE";
/// Default open/close tags removed entirely (tag only, inner text kept).
pub const DEFAULT_STRIP_TAGS: &[&str] = &["p", "b", "li", "ol", "ul", "sup", "em"];

/// Normalizes one text fragment for voice reading.
pub struct TextNormalizer {
    link_placeholder: String,
    image_placeholder: String,
    strip_tags: Vec<String>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            link_placeholder: DEFAULT_LINK_PLACEHOLDER.to_string(),
            image_placeholder: DEFAULT_IMAGE_PLACEHOLDER.to_string(),
            strip_tags: DEFAULT_STRIP_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TextNormalizer {
    pub fn new(
        link_placeholder: impl Into<String>,
        image_placeholder: impl Into<String>,
        strip_tags: Vec<String>,
    ) -> Self {
        Self {
            link_placeholder: link_placeholder.into(),
            image_placeholder: image_placeholder.into(),
            strip_tags,
        }
    }

    /// Normalize a raw fragment.
    ///
    /// Placeholder substitution runs before tag stripping so that tags
    /// nested inside an anchor or image construct are consumed by the
    /// dedicated pattern instead of being half-stripped by the generic pass.
    pub fn normalize(&self, text: &str) -> String {
        let text = self.replace_anchors(text);
        let text = self.replace_images(&text);
        self.strip_fixed_tags(&text)
    }

    /// Replace every `<a href="...">...</a>` with the link placeholder.
    ///
    /// The match is non-greedy to the nearest `</a>` and applied per
    /// occurrence, so two separate links in one body yield two placeholders
    /// rather than one spanning both.
    fn replace_anchors(&self, text: &str) -> String {
        let re = RE_ANCHOR.get_or_init(|| Regex::new(r#"(?s)<a href=".*?</a>"#).unwrap());
        re.replace_all(text, NoExpand(self.link_placeholder.as_str()))
            .into_owned()
    }

    /// Replace every `<img src="..." alt="...">` with the image placeholder.
    fn replace_images(&self, text: &str) -> String {
        let re = RE_IMAGE.get_or_init(|| Regex::new(r#"(?s)<img src=".*?alt=".*?>"#).unwrap());
        re.replace_all(text, NoExpand(self.image_placeholder.as_str()))
            .into_owned()
    }

    /// Remove the fixed open/close tag set, tags only.
    fn strip_fixed_tags(&self, text: &str) -> String {
        let mut result = text.to_string();
        for tag in &self.strip_tags {
            result = result.replace(&format!("<{tag}>"), "");
            result = result.replace(&format!("</{tag}>"), "");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_replacement() {
        let n = TextNormalizer::default();
        let result = n.normalize(r#"See <a href="http://x.test">this puzzle</a> for details."#);
        assert_eq!(result, "See SOME HTML LINK for details.");
    }

    #[test]
    fn test_two_anchors_become_two_placeholders() {
        let n = TextNormalizer::default();
        let result = n.normalize(
            r#"<a href="http://x">link</a> and <a href="http://y">link2</a>"#,
        );
        assert_eq!(result, "SOME HTML LINK and SOME HTML LINK");
    }

    #[test]
    fn test_image_replacement() {
        let n = TextNormalizer::default();
        let result = n.normalize(r#"Look: <img src="http://x/p.png" alt="a chessboard"> here."#);
        assert_eq!(result, "Look: SOME IMAGE here.");
    }

    #[test]
    fn test_fixed_tags_stripped_inner_text_kept() {
        let n = TextNormalizer::default();
        let result = n.normalize("<p>Hello <b>bold</b> and <em>em</em></p><ul><li>one</li></ul>");
        assert_eq!(result, "Hello bold and emone");
    }

    #[test]
    fn test_nested_tags_inside_anchor_consumed_by_anchor_pattern() {
        let n = TextNormalizer::default();
        let result = n.normalize(r#"<a href="http://x"><b>bold link</b></a> tail"#);
        assert_eq!(result, "SOME HTML LINK tail");
    }

    #[test]
    fn test_unmatched_markup_passes_through() {
        let n = TextNormalizer::default();
        let input = "x < y and <blockquote>quoted</blockquote> &amp; <code>k</code>";
        assert_eq!(n.normalize(input), input);
    }

    #[test]
    fn test_idempotent_on_normalized_text() {
        let n = TextNormalizer::default();
        let once = n.normalize(
            r#"<p>Take <a href="http://x">this</a> and <img src="u" alt="v"> there.</p>"#,
        );
        let twice = n.normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_tags_with_attributes_are_not_stripped() {
        // Only the bare literal forms are removed, matching the fixed list.
        let n = TextNormalizer::default();
        let input = r#"<p class="x">styled</p>"#;
        assert_eq!(n.normalize(input), r#"<p class="x">styled"#);
    }

    #[test]
    fn test_custom_placeholders() {
        let n = TextNormalizer::new("LINK", "PICTURE", vec!["p".to_string()]);
        let result = n.normalize(r#"<p><a href="u">t</a> <img src="u" alt="a"></p>"#);
        assert_eq!(result, "LINK PICTURE");
    }

    #[test]
    fn test_multiline_anchor() {
        let n = TextNormalizer::default();
        let result = n.normalize("before <a href=\"u\">line\nbroken</a> after");
        assert_eq!(result, "before SOME HTML LINK after");
    }
}
