use serde::{Deserialize, Serialize};

/// Default text direction of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// A unique-identifier entry for one locale: the identifier string plus
/// the direction it is rendered in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedValue {
    pub value: String,
    pub direction: TextDirection,
}
