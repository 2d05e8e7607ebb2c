use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRendering {
    Auto,
    Pixelated,
    CrispEdges,
}

#[allow(dead_code)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageAppearance {
    Auto,
    Monochrome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HtmlTag {
    Ruby,
    RubyText,
    RubyParenthesis,
    Table,
    TableData,
    TableHeader,
    TableBody,
    TableFooter,
    TableRow,
    Anchor,
    Span,
    Div,
    OrderedList,
    UnorderedList,
    ListItem,
    Details,
    Summary,
    Break,
    /// Any tag not otherwise recognized; passed through as a generic container
    /// so unrecognized structured-content nodes still render instead of vanishing.
    Other(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentMatchType {
    String(String),
    Element(Box<Element>),
    Content(Vec<ContentMatchType>),
}

/// Alias for the root of a structured-content tree, as stored in a
/// dictionary's `content` field before it is rendered to HTML.
pub type MainStructuredContent = ContentMatchType;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlign {
    Baseline,
    Sub,
    Super,
    TextTop,
    TextBottom,
    Middle,
    Top,
    Bottom,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextDecorationLine {
    Underline,
    Overline,
    LineThrough,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextDecorationLineOrNone {
    None,
    TextDecorationLine(TextDecorationLine),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextDecorationStyle {
    Solid,
    Double,
    Dotted,
    Dashed,
    Wavy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordBreak {
    Normal,
    BreakAll,
    KeepAll,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Start,
    End,
    Left,
    Right,
    Center,
    Justify,
    JustifyAll,
    MatchParent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeUnits {
    Px,
    Em,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredContentStyle {
    pub font_style: Option<FontStyle>,
    pub font_weight: Option<FontWeight>,
    pub font_size: Option<String>,
    pub color: Option<String>,
    pub background: Option<String>,
    pub background_color: Option<String>,
    pub text_decoration_line: Option<TextDecorationLineOrNone>,
    pub text_decoration_style: Option<TextDecorationStyle>,
    pub text_decoration_color: Option<String>,
    pub border_color: Option<String>,
    pub border_style: Option<String>,
    pub border_radius: Option<String>,
    pub border_width: Option<String>,
    pub clip_path: Option<String>,
    pub vertical_align: Option<VerticalAlign>,
    pub text_align: Option<TextAlign>,
    pub text_emphasis: Option<String>,
    pub text_shadow: Option<String>,
    pub margin: Option<String>,
    pub margin_top: Option<String>,
    pub margin_left: Option<String>,
    pub margin_right: Option<String>,
    pub margin_bottom: Option<String>,
    pub padding: Option<String>,
    pub padding_top: Option<String>,
    pub padding_left: Option<String>,
    pub padding_right: Option<String>,
    pub padding_bottom: Option<String>,
    pub word_break: Option<WordBreak>,
    pub white_space: Option<String>,
    pub cursor: Option<String>,
    pub list_style_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    LineBreak(LineBreak),
    UnstyledElement(UnstyledElement),
    TableElement(TableElement),
    StyledElement(StyledElement),
    ImageElement(ImageElement),
    LinkElement(LinkElement),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// This element doesn't support children or support language.
pub struct LineBreak {
    pub tag: HtmlTag,
    pub data: Option<HashMap<String, String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstyledElement {
    /// `UnstyledElements`' tags are:
    /// `Ruby`, `RubyTag` `RubyParenthesis`, `Table`, `TableHeader`, `TableBody`, `TableFooter`, `TableRow`.
    pub tag: HtmlTag,
    pub content: Option<ContentMatchType>,
    pub data: Option<HashMap<String, String>>,
    /// Defines the language of an element in the format defined by RFC 5646.
    pub lang: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableElement {
    /// `TableElement`'s tags are:
    /// `TableData`, `TableHeader` .
    pub tag: HtmlTag,
    pub content: Option<ContentMatchType>,
    pub data: Option<HashMap<String, String>>,
    pub col_span: u16,
    pub row_span: u16,
    pub style: Option<StructuredContentStyle>,
    /// Defines the language of an element in the format defined by RFC 5646.
    pub lang: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledElement {
    /// `StyledElement`'s tags are:
    /// `Span`, `Div`, `OrderedList`, `UnorderedList`, `ListItem`, `Details`, `Summary`.
    pub tag: HtmlTag,
    pub content: Option<ContentMatchType>,
    pub data: Option<HashMap<String, String>>,
    pub style: Option<StructuredContentStyle>,
    /// Hover text for the element.
    pub title: Option<String>,
    /// Defines the language of an element in the format defined by RFC 5646.
    pub lang: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkElement {
    /// `LinkElement`'s tags are:
    /// `Anchor`.
    pub tag: HtmlTag,
    pub content: Option<ContentMatchType>,
    /// The URL for the link.
    /// URLs starting with a `?` are treated as internal links to other dictionary content.
    pub href: String,
    /// Defines the language of an element in the format defined by RFC 5646.
    ///yomichan_rs will **only** ever support `ja` & `ja-JP`.
    pub lang: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageElementBase {
    pub data: Option<HashMap<String, String>>,
    /// Path to the image file in the archive.
    pub path: String,
    /// Preferred width of the image.
    pub width: Option<u16>,
    /// Preferred height of the image.
    pub height: Option<u16>,
    /// Preferred width of the image.
    /// This is only used in the internal database.
    pub preferred_width: Option<u16>,
    /// Preferred height of the image.
    /// This is only used in the internal database.
    pub preferred_height: Option<u16>,
    /// Hover text for the image.
    pub title: Option<String>,
    /// Alt text for the image.
    pub alt: Option<String>,
    /// Description of the image.
    pub description: Option<String>,
    /// Whether or not the image should appear pixelated at sizes larger than the image's native resolution.
    pub pixelated: Option<bool>,
    /// Controls how the image is rendered. The value of this field supersedes the pixelated field.
    pub image_rendering: Option<ImageRendering>,
    /// Controls the appearance of the image. The 'monochrome' value will mask the opaque parts of the image using the current text color.
    pub appearance: Option<ImageAppearance>,
    /// Whether or not a background color is displayed behind the image.
    pub background: Option<bool>,
    /// Whether or not the image is collapsed by default.
    pub collapsed: Option<bool>,
    /// Whether or not the image can be collapsed.
    pub collapsible: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageElement {
    /// The base properties of the image element.
    pub base: ImageElementBase,
    /// This element doesn't support children.
    pub content: Option<()>,
    /// The vertical alignment of the image.
    pub vertical_align: Option<VerticalAlign>,
    /// Shorthand for border width, style, and color.
    pub border: Option<String>,
    /// Roundness of the corners of the image's outer border edge.
    pub border_radius: Option<String>,
    /// The units for the width and height.
    pub size_units: Option<SizeUnits>,
}
