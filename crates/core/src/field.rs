use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The queryable fields of a collection, in discovery order.
///
/// Field names are dot-paths for nested document fields (`parent.child`).
/// Catalogs are built once per provider and never rebuilt — schema changes in
/// the backing store are not observed until the process restarts.
pub type FieldCatalog = IndexMap<String, Field>;

/// The semantic type of a queryable field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// A text field.
    String,

    /// A floating-point or decimal field.
    Number,

    /// An integral field.
    Integer,

    /// A boolean field.
    Boolean,

    /// A nested object field.
    Object,

    /// An unrecognized native type, passed through by name.
    #[serde(untagged)]
    Other(String),
}

/// A queryable field: a semantic type plus an optional format refinement.
///
/// # Examples
///
/// ```
/// use ogcfeat::{Field, FieldType};
///
/// let field = Field::with_format(FieldType::String, "date-time");
/// assert!(!field.is_plain_string());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// The semantic type.
    #[serde(rename = "type")]
    pub r#type: FieldType,

    /// An optional format refinement, e.g. `date`, `date-time`, `time`,
    /// `duration`, or a native numeric subtype such as `float` or `long`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<String>,
}

impl Field {
    /// Creates a field with no format.
    pub fn new(r#type: FieldType) -> Field {
        Field {
            r#type,
            format: None,
        }
    }

    /// Creates a field with a format refinement.
    pub fn with_format(r#type: FieldType, format: impl ToString) -> Field {
        Field {
            r#type,
            format: Some(format.to_string()),
        }
    }

    /// Returns true if this is a string field without a temporal format.
    ///
    /// Plain strings are the fields that need an un-analyzed (`raw`) sub-field
    /// for exact matching and sorting in a document store.
    pub fn is_plain_string(&self) -> bool {
        self.r#type == FieldType::String
            && !matches!(self.format.as_deref(), Some("date" | "date-time" | "time"))
    }
}
