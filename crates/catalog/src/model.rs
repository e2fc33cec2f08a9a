//! Product records and the inputs used to create and patch them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::CatalogError;

/// A stored product.
///
/// Declared fields are typed; anything else an update introduces is kept in
/// `extra` and written next to them in the same JSON object.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Non-finite prices are written as `null` and read back as NaN.
    #[serde(deserialize_with = "price_or_nan")]
    pub price: f64,
    pub thumbnail: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Merge `patch` into a copy of this record.
    ///
    /// Keys naming declared fields overwrite them and must carry a value of
    /// the right type. Other keys are added to `extra`. `id` is not protected.
    pub fn merged(&self, patch: &ProductPatch) -> Result<Product, CatalogError> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut value {
            for (key, v) in patch.iter() {
                fields.insert(key.clone(), v.clone());
            }
        }
        serde_json::from_value(value).map_err(|e| CatalogError::InvalidPatch(e.to_string()))
    }
}

fn price_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Candidate record for `add_product`: everything except the identifier.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub thumbnail: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<f64>,
}

impl NewProduct {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        thumbnail: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            price,
            thumbnail: thumbnail.into(),
            code: code.into(),
            stock: None,
        }
    }

    pub fn with_stock(mut self, stock: f64) -> Self {
        self.stock = Some(stock);
        self
    }

    pub(crate) fn into_product(self, id: u64) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            thumbnail: self.thumbnail,
            code: self.code,
            stock: self.stock,
            extra: Map::new(),
        }
    }
}

/// Field overrides for `update_product`, applied in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductPatch(Map<String, Value>);

impl ProductPatch {
    pub fn new() -> Self { Self::default() }

    /// Set `key` to `value`, replacing an earlier value for the same key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Build a patch from an arbitrary JSON value; only objects are accepted.
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CatalogError::InvalidPatch(format!("expected an object, got {other}"))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> { self.0.iter() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<Map<String, Value>> for ProductPatch {
    fn from(map: Map<String, Value>) -> Self { Self(map) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Product {
        NewProduct::new("test title", "test description", 10.0, "test img", "AbC123").into_product(1)
    }

    #[test]
    fn stock_is_omitted_when_absent() -> Result<(), anyhow::Error> {
        let v = serde_json::to_value(sample())?;
        assert!(v.get("stock").is_none());
        assert_eq!(v["id"], json!(1));
        assert_eq!(v["code"], json!("AbC123"));

        let with_stock = NewProduct::new("t", "d", 1.0, "i", "c").with_stock(7.0).into_product(2);
        assert_eq!(serde_json::to_value(with_stock)?["stock"], json!(7.0));
        Ok(())
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() -> Result<(), anyhow::Error> {
        let raw = json!({
            "id": 4, "title": "t", "description": "d", "price": 3,
            "thumbnail": "i", "code": "c", "color": "red"
        });
        let p: Product = serde_json::from_value(raw.clone())?;
        assert_eq!(p.price, 3.0);
        assert_eq!(p.stock, None);
        assert_eq!(p.extra.get("color"), Some(&json!("red")));
        assert_eq!(serde_json::to_value(&p)?["color"], json!("red"));
        Ok(())
    }

    #[test]
    fn merge_touches_only_patched_fields() -> Result<(), anyhow::Error> {
        let original = sample();
        let merged = original.merged(&ProductPatch::new().set("price", 500))?;
        assert_eq!(merged.price, 500.0);
        assert_eq!(merged.title, original.title);
        assert_eq!(merged.description, original.description);
        assert_eq!(merged.thumbnail, original.thumbnail);
        assert_eq!(merged.code, original.code);
        assert_eq!(merged.id, original.id);
        assert!(merged.extra.is_empty());
        // source record is left alone
        assert_eq!(original.price, 10.0);
        Ok(())
    }

    #[test]
    fn merge_accepts_new_attributes_and_id() -> Result<(), anyhow::Error> {
        let merged = sample().merged(
            &ProductPatch::new().set("id", 42).set("stock", 50).set("featured", true),
        )?;
        assert_eq!(merged.id, 42);
        assert_eq!(merged.stock, Some(50.0));
        assert_eq!(merged.extra.get("featured"), Some(&json!(true)));

        let cleared = merged.merged(&ProductPatch::new().set("stock", Value::Null))?;
        assert_eq!(cleared.stock, None);
        Ok(())
    }

    #[test]
    fn fractional_stock_loads_and_merges() -> Result<(), anyhow::Error> {
        let raw = json!({
            "id": 1, "title": "t", "description": "d", "price": 1,
            "thumbnail": "i", "code": "c", "stock": 2.5
        });
        let p: Product = serde_json::from_value(raw)?;
        assert_eq!(p.stock, Some(2.5));

        let merged = p.merged(&ProductPatch::new().set("stock", 0.25))?;
        assert_eq!(merged.stock, Some(0.25));
        Ok(())
    }

    #[test]
    fn null_price_reads_as_nan_and_still_merges() -> Result<(), anyhow::Error> {
        let raw = json!({
            "id": 1, "title": "t", "description": "d", "price": null,
            "thumbnail": "i", "code": "c"
        });
        let p: Product = serde_json::from_value(raw)?;
        assert!(p.price.is_nan());

        let infinite = NewProduct::new("t", "d", f64::INFINITY, "i", "c").into_product(2);
        let merged = infinite.merged(&ProductPatch::new())?;
        assert!(merged.price.is_nan());
        assert_eq!(merged.code, "c");

        let priced = merged.merged(&ProductPatch::new().set("price", 12.5))?;
        assert_eq!(priced.price, 12.5);
        Ok(())
    }

    #[test]
    fn merge_rejects_mistyped_declared_field() {
        let err = sample().merged(&ProductPatch::new().set("price", "cheap"));
        assert!(matches!(err, Err(CatalogError::InvalidPatch(_))));
    }

    #[test]
    fn patch_from_value_requires_object() -> Result<(), anyhow::Error> {
        let patch = ProductPatch::from_value(json!({"title": "new title"}))?;
        assert_eq!(patch.len(), 1);
        assert!(matches!(ProductPatch::from_value(json!([1, 2])), Err(CatalogError::InvalidPatch(_))));
        Ok(())
    }
}
