//! Request and response types for the store backend REST API.
//!
//! Field names follow the backend's JSON exactly. Optional fields carry
//! `#[serde(default)]` so older backend builds that omit them still parse.

pub mod admin;
pub mod auth;
pub mod category;
pub mod dashboard;
pub mod order;
pub mod product;
pub mod user;

pub use admin::*;
pub use auth::*;
pub use category::*;
pub use dashboard::*;
pub use order::*;
pub use product::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The `{ "success", "message", "data" }` wrapper most endpoints return.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// A body that is either wrapped in an [`Envelope`] or returned bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MaybeEnveloped<T> {
    Enveloped { data: T },
    Bare(T),
}

impl<T> MaybeEnveloped<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Enveloped { data } | Self::Bare(data) => data,
        }
    }
}

/// Result of a bulk or mutation endpoint whose shape the panel only reports.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub struct OperationReport {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl OperationReport {
    /// Scalar fields of the report as `(label, value)` rows for display.
    #[must_use]
    pub fn summary_rows(&self) -> Vec<(String, String)> {
        self.details
            .iter()
            .filter_map(|(key, value)| {
                let rendered = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    serde_json::Value::Array(items) => format!("{} item(s)", items.len()),
                    _ => return None,
                };
                Some((key.replace('_', " "), rendered))
            })
            .collect()
    }

    /// Error lines reported by the backend, if any.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.details
            .get("errors")
            .and_then(serde_json::Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .map(|e| match e {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_maybe_enveloped_accepts_both_shapes() {
        let wrapped: MaybeEnveloped<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2]}"#).unwrap();
        assert_eq!(wrapped.into_inner(), vec![1, 2]);

        let bare: MaybeEnveloped<Vec<u32>> = serde_json::from_str("[3]").unwrap();
        assert_eq!(bare.into_inner(), vec![3]);
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let json = r#"{"id":"c1","name":"Tools","subcategories":null,"slug":null}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert!(category.subcategories.is_empty());
        assert!(category.slug.is_empty());
    }

    #[test]
    fn test_operation_report_rows_and_errors() {
        let report: OperationReport = serde_json::from_str(
            r#"{"success":true,"message":"done","created_count":4,"errors":["row 3: bad price"],"meta":{"x":1}}"#,
        )
        .unwrap();

        assert_eq!(report.message.as_deref(), Some("done"));
        let rows = report.summary_rows();
        assert!(rows.contains(&("created count".to_string(), "4".to_string())));
        assert!(rows.contains(&("errors".to_string(), "1 item(s)".to_string())));
        assert!(!rows.iter().any(|(k, _)| k == "meta"));
        assert_eq!(report.errors(), vec!["row 3: bad price".to_string()]);
    }
}
