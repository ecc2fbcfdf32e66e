use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::AssistantId;

/// Rewrites decoded tool-call arguments in place before validation
pub type Normalizer = fn(&mut Map<String, Value>);

/// Argument normalizers keyed by assistant. Argument shapes differ between
/// tool schema revisions; normalizing keeps rules comparable across them.
#[derive(Clone, Debug)]
pub struct NormalizerRegistry {
    normalizers: HashMap<AssistantId, Vec<Normalizer>>,
}

impl Default for NormalizerRegistry {
    fn default() -> Self {
        Self::empty()
            .register(AssistantId::new("color"), flatten_custom_colors)
            .register(AssistantId::new("image"), fold_description)
    }
}

impl NormalizerRegistry {
    pub fn empty() -> Self {
        Self { normalizers: HashMap::new() }
    }

    pub fn register(mut self, assistant: AssistantId, normalizer: Normalizer) -> Self {
        self.normalizers.entry(assistant).or_default().push(normalizer);
        self
    }

    pub fn normalize(&self, assistant: &AssistantId, args: &mut Map<String, Value>) {
        for normalizer in self.normalizers.get(assistant).into_iter().flatten() {
            normalizer(args);
        }
    }
}

/// `[{"slug": "x", "color": "#fff"}]` becomes `["#fff"]`
pub fn flatten_custom_colors(args: &mut Map<String, Value>) {
    if let Some(Value::Array(colors)) = args.get_mut("custom_colors") {
        for color in colors.iter_mut() {
            if let Some(scalar) = color.get("color").cloned() {
                *color = scalar;
            }
        }
    }
}

/// Lower-cases a free-text description and collapses its whitespace
pub fn fold_description(args: &mut Map<String, Value>) {
    if let Some(Value::String(description)) = args.get_mut("description") {
        *description = description
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
    }
}
