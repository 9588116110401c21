use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Errors raised while validating caller-supplied item payloads
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("Field '{0}' must be a JSON object")]
    NotAnObject(&'static str),
}

/// A stored item. Only model, version, data and the deleted flag can be
/// edited by a caller; id and the timestamps are reserved and maintained by
/// the server.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: Uuid,
    pub model: String,
    pub version: f64,
    pub data: Value,
    pub created: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
    pub deleted: bool,
}

impl Item {
    /// Build a fresh item from a validated draft. The id and created
    /// timestamp are assigned here; last_updated stays empty until the first
    /// mutation.
    pub fn from_draft(draft: ItemDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: draft.model,
            version: draft.version,
            data: draft.data,
            // Postgres keeps microseconds; truncate so the value we return
            // matches what a later read will produce
            created: Utc::now().trunc_subsecs(6),
            last_updated: None,
            deleted: draft.deleted,
        }
    }
}

/// Payload for creating an item (POST / and PUT /item/:id).
///
/// Unknown keys are rejected so reserved fields (id, created, last_updated)
/// can never sneak in through the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemDraft {
    pub model: String,
    #[serde(default)]
    pub version: f64,
    pub data: Value,
    #[serde(default)]
    pub deleted: bool,
}

impl ItemDraft {
    pub fn validate(&self) -> Result<(), ItemError> {
        if self.model.trim().is_empty() {
            return Err(ItemError::MissingRequiredField("model"));
        }
        if !self.data.is_object() {
            return Err(ItemError::NotAnObject("data"));
        }
        Ok(())
    }
}

/// Payload for PATCH /item/:id. Absent fields keep their stored values;
/// `data`, when present, replaces the stored object wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemPatch {
    pub model: Option<String>,
    pub version: Option<f64>,
    pub data: Option<Value>,
    pub deleted: Option<bool>,
}

impl ItemPatch {
    pub fn validate(&self) -> Result<(), ItemError> {
        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err(ItemError::MissingRequiredField("model"));
            }
        }
        if let Some(data) = &self.data {
            if !data.is_object() {
                return Err(ItemError::NotAnObject("data"));
            }
        }
        Ok(())
    }

    /// Apply the present fields onto an existing item
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(model) = &self.model {
            item.model = model.clone();
        }
        if let Some(version) = self.version {
            item.version = version;
        }
        if let Some(data) = &self.data {
            item.data = data.clone();
        }
        if let Some(deleted) = self.deleted {
            item.deleted = deleted;
        }
    }
}

/// Aggregate metadata for one model name, served by GET /model/list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model: String,
    /// Items not marked deleted
    pub count: i64,
    pub deleted_count: i64,
    pub total_count: i64,
    pub oldest_created: DateTime<Utc>,
    pub newest_created: DateTime<Utc>,
    /// Histogram of version tag -> item count
    pub versions: BTreeMap<String, i64>,
}

/// Display form for a version tag used as a JSON object key. Whole numbers
/// drop the trailing ".0" so "1" and 1.0 land in the same bucket.
pub fn version_key(version: f64) -> String {
    if version.fract() == 0.0 && version.abs() < 1e15 {
        format!("{}", version as i64)
    } else {
        version.to_string()
    }
}

/// Fold raw version tags into a histogram
pub fn version_histogram(versions: &[f64]) -> BTreeMap<String, i64> {
    let mut histogram = BTreeMap::new();
    for &v in versions {
        *histogram.entry(version_key(v)).or_insert(0) += 1;
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft_requires_model() {
        let draft = ItemDraft {
            model: "  ".to_string(),
            version: 0.0,
            data: json!({}),
            deleted: false,
        };
        assert!(matches!(draft.validate(), Err(ItemError::MissingRequiredField("model"))));
    }

    #[test]
    fn draft_requires_object_data() {
        let draft = ItemDraft {
            model: "ContactForm".to_string(),
            version: 1.0,
            data: json!(["not", "an", "object"]),
            deleted: false,
        };
        assert!(matches!(draft.validate(), Err(ItemError::NotAnObject("data"))));
    }

    #[test]
    fn draft_rejects_reserved_fields() {
        let result: Result<ItemDraft, _> = serde_json::from_value(json!({
            "model": "ContactForm",
            "data": {},
            "id": "0c9adcd0-0000-0000-0000-000000000000"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn draft_defaults() {
        let draft: ItemDraft = serde_json::from_value(json!({
            "model": "ContactForm",
            "data": {"email": "avi@email.com"}
        }))
        .unwrap();
        assert_eq!(draft.version, 0.0);
        assert!(!draft.deleted);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut item = Item::from_draft(ItemDraft {
            model: "ContactForm".to_string(),
            version: 1.0,
            data: json!({"key": "value"}),
            deleted: false,
        });

        let patch: ItemPatch = serde_json::from_value(json!({
            "data": {"key": "new value"}
        }))
        .unwrap();
        patch.validate().unwrap();
        patch.apply_to(&mut item);

        assert_eq!(item.model, "ContactForm");
        assert_eq!(item.version, 1.0);
        assert_eq!(item.data, json!({"key": "new value"}));
    }

    #[test]
    fn patch_data_replaces_wholesale() {
        let mut item = Item::from_draft(ItemDraft {
            model: "ContactForm".to_string(),
            version: 0.0,
            data: json!({"a": 1, "b": 2}),
            deleted: false,
        });

        let patch = ItemPatch { data: Some(json!({"c": 3})), ..Default::default() };
        patch.apply_to(&mut item);

        // No deep merge: the old keys are gone
        assert_eq!(item.data, json!({"c": 3}));
    }

    #[test]
    fn version_keys_drop_trailing_zero() {
        assert_eq!(version_key(0.0), "0");
        assert_eq!(version_key(1.0), "1");
        assert_eq!(version_key(1.5), "1.5");
    }

    #[test]
    fn version_histogram_counts_buckets() {
        let histogram = version_histogram(&[1.0, 1.0, 2.5, 0.0]);
        assert_eq!(histogram.get("1"), Some(&2));
        assert_eq!(histogram.get("2.5"), Some(&1));
        assert_eq!(histogram.get("0"), Some(&1));
    }
}
