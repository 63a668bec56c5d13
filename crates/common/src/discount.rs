use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One product/offer entry of an establishment's catalog file
///
/// Catalog files are edited by hand, so a record is kept exactly as stored:
/// `GET /discount` returns it unchanged and listings only look at the
/// `name`, `icon` and `id` keys. Known keys besides those are `price`,
/// `description`, `rating`, `type` and `items` (a list of choice groups when
/// `type` is `combo`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Discount(pub Value);

impl Discount {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether this record's `id` equals `id`. Numeric ids compare by their
    /// decimal text, so `7` matches `"7"`.
    pub fn has_id(&self, id: &str) -> bool {
        match self.field("id") {
            Some(Value::String(s)) => s == id,
            Some(Value::Number(n)) => n.to_string() == id,
            _ => false,
        }
    }
}

/// Projection of a discount used by listings. Keys absent from the record
/// are absent from the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl From<&Discount> for DiscountSummary {
    fn from(discount: &Discount) -> Self {
        Self {
            name: discount.field("name").cloned(),
            icon: discount.field("icon").cloned(),
            id: discount.field("id").cloned(),
        }
    }
}

/// Contents of one establishment's catalog file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub discounts: Vec<Discount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_discount_is_kept_verbatim() {
        let value = json!({
            "id": "r7",
            "name": "Lunch combo",
            "icon": "combo.png",
            "price": 12.5,
            "rating": null,
            "type": "combo",
            "items": [["burger", "wrap"], ["fries", "salad"]],
            "expires": "2023-06-30"
        });

        let discount: Discount = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(discount.field("rating"), Some(&Value::Null));
        assert_eq!(serde_json::to_value(&discount).unwrap(), value);
    }

    #[test]
    fn test_summary_projection() {
        let discount = Discount(json!({
            "id": "r1",
            "name": "Diner special",
            "icon": "diner.png",
            "rating": true
        }));

        let summary = DiscountSummary::from(&discount);
        assert_eq!(
            serde_json::to_value(summary).unwrap(),
            json!({"name": "Diner special", "icon": "diner.png", "id": "r1"})
        );
    }

    #[test]
    fn test_summary_omits_absent_keys() {
        let discount = Discount(json!({"id": "r2", "name": "No icon yet"}));

        let summary = DiscountSummary::from(&discount);
        assert_eq!(
            serde_json::to_value(summary).unwrap(),
            json!({"name": "No icon yet", "id": "r2"})
        );
    }

    #[test]
    fn test_id_matching() {
        assert!(Discount(json!({"id": "c1"})).has_id("c1"));
        assert!(Discount(json!({"id": 7})).has_id("7"));
        assert!(!Discount(json!({"id": "c1"})).has_id("c2"));
        assert!(!Discount(json!({"name": "no id"})).has_id(""));
        assert!(!Discount(json!("not an object")).has_id("c1"));
    }
}
