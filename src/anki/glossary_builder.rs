//! Renders a term's glossary entries to the HTML fragments a note's
//! `{glossary}` marker expands into, grounded on
//! `original_source/src/anki/glossarybuilder.cpp`.
//!
//! Structured content (the `term_glossary_structured_content` variant) is
//! stored by the importer as a raw, un-rendered JSON string; this module is
//! what actually turns that tree into HTML, replacing any `img`/file
//! references along the way with content-hashed filenames recorded in a
//! [`FileMap`] the caller copies into the deck's media collection.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::dictionary_data::{TermGlossaryContent, TermGlossaryType};
use crate::structured_content::{
    Element, FontStyle, FontWeight, HtmlTag, ImageElement, MainStructuredContent,
    StructuredContentStyle, TextDecorationLineOrNone, VerticalAlign,
};

/// One `(source_path, hashed_filename)` pair collected while rendering.
/// The caller is responsible for actually copying `source_path` into the
/// deck's media folder under `hashed_filename`.
pub type FileMap = Vec<(String, String)>;

/// Renders every entry in `definitions` to an HTML string, appending any
/// referenced media files to `file_map`. Mirrors `buildGlossary`: one output
/// string per input glossary entry, in the same order.
pub fn build_glossary(
    definitions: &[TermGlossaryContent],
    basepath: &Path,
    file_map: &mut FileMap,
) -> Vec<String> {
    definitions
        .iter()
        .map(|entry| build_entry(entry, basepath, file_map))
        .collect()
}

fn build_entry(entry: &TermGlossaryContent, basepath: &Path, file_map: &mut FileMap) -> String {
    if let Some(structured) = &entry.term_glossary_structured_content {
        let mut out = String::new();
        match serde_json::from_str::<MainStructuredContent>(&structured.content) {
            Ok(content) => add_structured_content(&content, basepath, &mut out, file_map),
            Err(_) => out.push_str(&escape_text(&structured.content)),
        }
        return out;
    }

    if let Some(image) = &entry.term_glossary_image {
        let mut out = String::new();
        add_image(image, basepath, &mut out, file_map);
        return out;
    }

    if let Some(text) = &entry.term_glossary_text {
        return escape_text(&text.text);
    }

    escape_text(&entry.term_glossary_string)
}

fn escape_text(text: &str) -> String {
    text.trim().replace('\n', "<br>")
}

/* Structured content rendering */

fn add_structured_content(
    content: &MainStructuredContent,
    basepath: &Path,
    out: &mut String,
    file_map: &mut FileMap,
) {
    match content {
        MainStructuredContent::String(s) => out.push_str(&escape_text(s)),
        MainStructuredContent::Content(children) => {
            for child in children {
                add_structured_content(child, basepath, out, file_map);
            }
        }
        MainStructuredContent::Element(el) => add_element(el, basepath, out, file_map),
    }
}

fn add_element(el: &Element, basepath: &Path, out: &mut String, file_map: &mut FileMap) {
    match el {
        Element::LineBreak(lb) => {
            out.push_str("<br");
            add_data(lb.data.as_ref(), out);
            out.push('>');
        }
        Element::ImageElement(img) => add_image_element(img, basepath, out, file_map),
        Element::UnstyledElement(e) => {
            let tag = tag_str(&e.tag);
            out.push('<');
            out.push_str(tag);
            add_data(e.data.as_ref(), out);
            out.push('>');
            if let Some(content) = &e.content {
                add_structured_content(content, basepath, out, file_map);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Element::TableElement(e) => {
            let tag = tag_str(&e.tag);
            out.push('<');
            out.push_str(tag);
            if e.col_span > 1 {
                out.push_str(&format!(" colspan=\"{}\"", e.col_span));
            }
            if e.row_span > 1 {
                out.push_str(&format!(" rowspan=\"{}\"", e.row_span));
            }
            if let Some(style) = &e.style {
                out.push_str(" style=\"");
                add_structured_style(style, out);
                out.push('"');
            }
            add_data(e.data.as_ref(), out);
            out.push('>');
            if let Some(content) = &e.content {
                add_structured_content(content, basepath, out, file_map);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Element::StyledElement(e) => {
            let tag = tag_str(&e.tag);
            out.push('<');
            out.push_str(tag);
            if let Some(style) = &e.style {
                out.push_str(" style=\"");
                add_structured_style(style, out);
                out.push('"');
            }
            add_data(e.data.as_ref(), out);
            out.push('>');
            if let Some(content) = &e.content {
                add_structured_content(content, basepath, out, file_map);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Element::LinkElement(e) => {
            out.push_str("<a href=\"");
            out.push_str(&e.href);
            out.push('"');
            out.push('>');
            if let Some(content) = &e.content {
                add_structured_content(content, basepath, out, file_map);
            }
            out.push_str("</a>");
        }
    }
}

fn tag_str(tag: &HtmlTag) -> &str {
    match tag {
        HtmlTag::Ruby => "ruby",
        HtmlTag::RubyText => "rt",
        HtmlTag::RubyParenthesis => "rp",
        HtmlTag::Table => "table",
        HtmlTag::TableData => "td",
        HtmlTag::TableHeader => "th",
        HtmlTag::TableBody => "tbody",
        HtmlTag::TableFooter => "tfoot",
        HtmlTag::TableRow => "tr",
        HtmlTag::Anchor => "a",
        HtmlTag::Span => "span",
        HtmlTag::Div => "div",
        HtmlTag::OrderedList => "ol",
        HtmlTag::UnorderedList => "ul",
        HtmlTag::ListItem => "li",
        HtmlTag::Details => "details",
        HtmlTag::Summary => "summary",
        HtmlTag::Break => "br",
        HtmlTag::Other(name) => name,
    }
}

fn add_data(data: Option<&std::collections::HashMap<String, String>>, out: &mut String) {
    let Some(data) = data else { return };
    for (key, value) in data {
        out.push_str(" data-");
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
}

fn add_structured_style(style: &StructuredContentStyle, out: &mut String) {
    if let Some(font_style) = &style.font_style {
        out.push_str("font-style: ");
        out.push_str(match font_style {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        });
        out.push(';');
    }
    if let Some(font_weight) = &style.font_weight {
        out.push_str("font-weight: ");
        out.push_str(match font_weight {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        });
        out.push(';');
    }
    if let Some(font_size) = &style.font_size {
        out.push_str("font-size: ");
        out.push_str(font_size);
        out.push(';');
    }
    if let Some(decoration) = &style.text_decoration_line {
        if let TextDecorationLineOrNone::TextDecorationLine(line) = decoration {
            out.push_str("text-decoration: ");
            out.push_str(match line {
                crate::structured_content::TextDecorationLine::Underline => "underline",
                crate::structured_content::TextDecorationLine::Overline => "overline",
                crate::structured_content::TextDecorationLine::LineThrough => "line-through",
            });
            out.push(';');
        }
    }
    if let Some(align) = &style.vertical_align {
        out.push_str("vertical-align: ");
        out.push_str(vertical_align_str(align));
        out.push(';');
    }
    if let Some(margin) = &style.margin_top {
        out.push_str("margin-top: ");
        out.push_str(margin);
        out.push_str("px;");
    }
    if let Some(margin) = &style.margin_left {
        out.push_str("margin-left: ");
        out.push_str(margin);
        out.push_str("px;");
    }
    if let Some(margin) = &style.margin_right {
        out.push_str("margin-right: ");
        out.push_str(margin);
        out.push_str("px;");
    }
    if let Some(margin) = &style.margin_bottom {
        out.push_str("margin-bottom: ");
        out.push_str(margin);
        out.push_str("px;");
    }
}

fn vertical_align_str(align: &VerticalAlign) -> &'static str {
    match align {
        VerticalAlign::Baseline => "baseline",
        VerticalAlign::Sub => "sub",
        VerticalAlign::Super => "super",
        VerticalAlign::TextTop => "text-top",
        VerticalAlign::TextBottom => "text-bottom",
        VerticalAlign::Middle => "middle",
        VerticalAlign::Top => "top",
        VerticalAlign::Bottom => "bottom",
    }
}

fn add_image_element(img: &ImageElement, basepath: &Path, out: &mut String, file_map: &mut FileMap) {
    let filename = add_file(basepath, &img.base.path, file_map);
    out.push_str("<img src=\"");
    out.push_str(&filename);
    out.push('"');
    if let Some(title) = &img.base.title {
        out.push_str(" title=\"");
        out.push_str(title);
        out.push('"');
    }
    out.push_str(" style=\"display: inline-table;vertical-align: ");
    out.push_str(img.vertical_align.as_ref().map_or("bottom", vertical_align_str));
    out.push(';');
    if let Some(width) = img.base.width {
        out.push_str(&format!("width: {width}px;"));
    }
    if let Some(height) = img.base.height {
        out.push_str(&format!("height: {height}px;"));
    }
    out.push('"');
    out.push('>');
    if let Some(description) = &img.base.description {
        out.push_str("<br>");
        out.push_str(&escape_text(description));
    }
}

/* Other glossary object parsers */

fn add_image(
    image: &crate::dictionary_data::TermGlossaryImage,
    basepath: &Path,
    out: &mut String,
    file_map: &mut FileMap,
) {
    debug_assert_eq!(image.term_glossary_type, TermGlossaryType::Image);
    let Some(term_image) = &image.term_image else {
        return;
    };
    let base = &term_image.image_element_base.base;
    let collapsible = base.collapsible.unwrap_or(true);
    let collapsed = base.collapsed.unwrap_or(false);

    if collapsible {
        out.push_str("<details");
        if !collapsed {
            out.push_str(" open");
        }
        out.push('>');
        out.push_str(
            "<summary style=\"text-decoration: underline;cursor: pointer;\">[Image]</summary>",
        );
    }

    out.push_str("<img src=\"");
    out.push_str(&add_file(basepath, &base.path, file_map));
    out.push('"');
    if let Some(width) = base.width {
        out.push_str(&format!(" width=\"{width}\""));
    }
    if let Some(height) = base.height {
        out.push_str(&format!(" height=\"{height}\""));
    }
    if let Some(title) = &base.title {
        out.push_str(" title=\"");
        out.push_str(title);
        out.push('"');
    }
    out.push_str(" style=\"display: inline-table;vertical-align: top;\">");

    if let Some(description) = &base.description {
        out.push_str("<br>");
        out.push_str(&escape_text(description));
    }

    if collapsible {
        out.push_str("</details>");
    }
}

/* Helpers */

/// Hashes `basepath.join(path)`'s content with SHA-256 (truncated to 16 hex
/// chars), records the `(full_path, hashed_filename)` pair in `file_map`,
/// and returns the hashed filename, preserving `path`'s original extension.
fn add_file(basepath: &Path, path: &str, file_map: &mut FileMap) -> String {
    let full_path = basepath.join(path);
    let Ok(data) = std::fs::read(&full_path) else {
        return format!("File not found at: {}", full_path.display());
    };

    let digest = Sha256::digest(&data);
    let mut hash = digest.iter().take(8).map(|b| format!("{b:02x}")).collect::<String>();

    if let Some(ext) = Path::new(path).extension().and_then(|e| e.to_str()) {
        hash.push('.');
        hash.push_str(ext);
    }

    file_map.push((full_path.display().to_string(), hash.clone()));
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary_data::{TermGlossaryStructuredContent, TermGlossaryText};
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_string_entry_escapes_newlines() {
        let mut file_map = FileMap::new();
        let entry = TermGlossaryContent {
            term_glossary_string: "line one\nline two".to_string(),
            ..Default::default()
        };
        let html = build_entry(&entry, Path::new("/tmp"), &mut file_map);
        assert_eq!(html, "line one<br>line two");
    }

    #[test]
    fn text_variant_takes_priority_over_plain_string() {
        let mut file_map = FileMap::new();
        let entry = TermGlossaryContent {
            term_glossary_string: "fallback".to_string(),
            term_glossary_text: Some(TermGlossaryText {
                term_glossary_type: TermGlossaryType::Text,
                text: "preferred".to_string(),
            }),
            ..Default::default()
        };
        let html = build_entry(&entry, Path::new("/tmp"), &mut file_map);
        assert_eq!(html, "preferred");
    }

    #[test]
    fn structured_content_renders_nested_span() {
        let json = r#"{"Element":{"StyledElement":{
            "tag":"Span",
            "content":{"String":"nested text"},
            "data":null,
            "style":null,
            "title":null,
            "lang":""
        }}}"#;
        let mut file_map = FileMap::new();
        let entry = TermGlossaryContent {
            term_glossary_structured_content: Some(TermGlossaryStructuredContent {
                content: json.to_string(),
            }),
            ..Default::default()
        };
        let html = build_entry(&entry, Path::new("/tmp"), &mut file_map);
        assert_eq!(html, "<span>nested text</span>");
    }

    #[test]
    fn malformed_structured_content_falls_back_to_escaped_text() {
        let mut file_map = FileMap::new();
        let entry = TermGlossaryContent {
            term_glossary_structured_content: Some(TermGlossaryStructuredContent {
                content: "not json\nat all".to_string(),
            }),
            ..Default::default()
        };
        let html = build_entry(&entry, Path::new("/tmp"), &mut file_map);
        assert_eq!(html, "not json<br>at all");
    }

    #[test]
    fn add_file_reports_missing_file_without_hashing() {
        let mut file_map = FileMap::new();
        let result = add_file(Path::new("/nonexistent"), "missing.png", &mut file_map);
        assert!(result.starts_with("File not found at:"));
        assert!(file_map.is_empty());
    }

    #[test]
    fn add_file_preserves_extension_and_records_mapping() {
        let dir = std::env::temp_dir().join("glossary_builder_test_add_file");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pic.png");
        std::fs::write(&path, b"fake png bytes").unwrap();

        let mut file_map = FileMap::new();
        let hashed = add_file(&dir, "pic.png", &mut file_map);
        assert!(hashed.ends_with(".png"));
        assert_eq!(file_map.len(), 1);
        assert_eq!(file_map[0].1, hashed);

        std::fs::remove_dir_all(&dir).ok();
    }
}
