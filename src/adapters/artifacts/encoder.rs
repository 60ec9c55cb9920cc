//! Fitted label encoder: class index to training label.

use serde::{Deserialize, Serialize};

use crate::domain::ObesityCategory;
use crate::ports::{LabelDecoder, ModelError};

/// Exported label encoder. `classes[i]` is the label for class index `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    #[must_use]
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Every class must be a distinct obesity category label.
    ///
    /// # Errors
    /// Returns a description of the first offending class.
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("classes is empty".into());
        }
        let mut seen = Vec::with_capacity(self.classes.len());
        for class in &self.classes {
            let category = ObesityCategory::from_label(class)
                .ok_or_else(|| format!("'{class}' is not an obesity category"))?;
            if seen.contains(&category) {
                return Err(format!("'{class}' appears more than once"));
            }
            seen.push(category);
        }
        Ok(())
    }
}

impl LabelDecoder for LabelEncoder {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn inverse_transform(&self, index: usize) -> Result<&str, ModelError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(ModelError::UnknownClass(index))
    }
}
