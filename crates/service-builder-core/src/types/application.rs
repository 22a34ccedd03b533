use serde::{Deserialize, Serialize};

use super::model::Model;

/// The root of a parsed definition file: models in declaration order.
///
/// Model names are not required to be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub models: Vec<Model>,
}

impl Application {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first model with the given name.
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }
}

impl From<Vec<Model>> for Application {
    fn from(models: Vec<Model>) -> Self {
        Self { models }
    }
}
