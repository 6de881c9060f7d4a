//! Assigned-class values arrive in several shapes depending on the endpoint:
//! a bare string, `{"class_name": ..}` or `{"className": ..}`. They are
//! normalised to plain names once, while the JSON is deserialised.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AssignedClass {
    Name(String),
    Snake { class_name: String },
    Camel {
        #[serde(rename = "className")]
        class_name: String,
    },
    Unknown(serde_json::Value),
}

impl AssignedClass {
    pub fn into_name(self) -> Option<String> {
        let name = match self {
            AssignedClass::Name(name) => name,
            AssignedClass::Snake { class_name } | AssignedClass::Camel { class_name } => class_name,
            AssignedClass::Unknown(value) => {
                log::debug!("Ignoring unrecognised assigned class value: {value}");
                return None;
            }
        };
        let trimmed = name.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Trimmed, non-empty class names in their original order.
pub fn normalize(raw: Vec<AssignedClass>) -> Vec<String> {
    raw.into_iter().filter_map(AssignedClass::into_name).collect()
}

/// `deserialize_with` adapter; `null` and a missing field both become an
/// empty list.
pub fn deserialize_class_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<AssignedClass>> = Option::deserialize(deserializer)?;
    Ok(raw.map(normalize).unwrap_or_default())
}

/// Split a comma-separated form field into distinct class names.
pub fn parse_class_list(raw: &str) -> Vec<String> {
    let mut classes: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !classes.iter().any(|c| c == name) {
            classes.push(name.to_string());
        }
    }
    classes
}
