use std::fmt;

use serde::{Deserialize, Serialize};

/// The storage type of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Int,
    Double,
    Date,
    DateTime,
}

impl FieldType {
    /// All field types, in declaration order.
    pub const ALL: [FieldType; 5] = [
        Self::String,
        Self::Int,
        Self::Double,
        Self::Date,
        Self::DateTime,
    ];

    /// Looks up a field type by its DSL keyword, ignoring ASCII case.
    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.keyword().eq_ignore_ascii_case(s))
    }

    /// The canonical lowercase DSL keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Double => "double",
            Self::Date => "date",
            Self::DateTime => "datetime",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
