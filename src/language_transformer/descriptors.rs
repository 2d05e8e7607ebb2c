use super::language_d::TextProcessorWithId;

/// A language's preprocessors/postprocessors before ids are attached.
pub struct PreAndPostProcessors {
    pub pre: Vec<TextProcessorWithId>,
    pub post: Vec<TextProcessorWithId>,
}

/// Same as [`PreAndPostProcessors`]; kept as a distinct name because the
/// translator keys its per-language map by this exact type.
pub struct PreAndPostProcessorsWithId {
    pub pre: Vec<TextProcessorWithId>,
    pub post: Vec<TextProcessorWithId>,
}
