use serde::{Deserialize, Serialize};

use super::field::Field;
use super::field_type::FieldType;
use super::pagination::Pagination;
use super::restful_actions::RestfulActions;

/// A model definition: name, fields in source order, and optional settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<RestfulActions>,
}

impl Model {
    /// Creates a model with no fields and no settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a field, keeping declaration order.
    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(Field::new(name, field_type));
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_actions(mut self, actions: RestfulActions) -> Self {
        self.actions = Some(actions);
        self
    }

    /// The actions a generator should expose for this model.
    ///
    /// Falls back to [`RestfulActions::all`] when no `actions` block was
    /// declared. An explicit empty action list stays empty.
    pub fn effective_actions(&self) -> RestfulActions {
        self.actions.unwrap_or_else(RestfulActions::all)
    }
}
