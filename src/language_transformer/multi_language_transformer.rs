//! Dispatches deinflection to the [`LanguageTransformer`] registered for a
//! given ISO language code.

use std::collections::HashMap;

use super::languages::get_all_language_transform_descriptors;
use super::transformer::{LanguageTransformer, TransformedText};

pub struct MultiLanguageTransformer {
    transformers: HashMap<&'static str, LanguageTransformer>,
}

impl MultiLanguageTransformer {
    pub fn new() -> Self {
        let mut transformers = HashMap::new();
        for (iso, descriptor) in get_all_language_transform_descriptors() {
            transformers.insert(iso, LanguageTransformer::from_descriptor(descriptor));
        }
        Self { transformers }
    }

    /// Runs the reverse-conjugation search for `language`; unsupported
    /// languages yield no candidates rather than erroring, since the caller
    /// already falls back to a passthrough deinflection when this is empty.
    pub fn transform(&self, language: &str, text: &str) -> Vec<TransformedText> {
        match self.transformers.get(language) {
            Some(transformer) => transformer.transform(text),
            None => Vec::new(),
        }
    }
}

impl Default for MultiLanguageTransformer {
    fn default() -> Self {
        Self::new()
    }
}
