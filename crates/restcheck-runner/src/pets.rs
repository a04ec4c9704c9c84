//! Petstore pet model, generated fixtures and shape validation

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Petstore pet as sent to and echoed by `POST /pet`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// 0 asks the server to assign an id
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub name: String,
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PetStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Category {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tag {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

/// Prefix of generated pet names.
const NAME_PREFIX: &str = "restcheck-";

/// `restcheck-` followed by 10 random alphanumerics.
pub fn generate_pet_name(rng: &mut impl Rng) -> String {
    format!("{NAME_PREFIX}{}", random_alnum(rng, 10))
}

/// Available pet with fixed category, photo and tag.
#[must_use]
pub fn new_pet(name: &str) -> Pet {
    Pet {
        id: 0,
        category: Some(Category {
            id: 1,
            name: "Dogs".to_string(),
        }),
        name: name.to_string(),
        photo_urls: vec!["https://images.dog.ceo/breeds/hound-afghan/n02088094_1003.jpg".to_string()],
        tags: vec![Tag {
            id: 1,
            name: "restcheck".to_string(),
        }],
        status: Some(PetStatus::Available),
    }
}

/// JSON Schema of [`Pet`].
#[must_use]
pub fn pet_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(Pet)).unwrap_or(Value::Bool(true))
}

/// Schema violations of `value` against [`pet_schema`], at most five.
#[must_use]
pub fn shape_errors(value: &Value) -> Vec<String> {
    let schema = pet_schema();
    match jsonschema::validator_for(&schema) {
        Ok(validator) => validator
            .iter_errors(value)
            .take(5)
            .map(|e| e.to_string())
            .collect(),
        Err(e) => vec![format!("pet schema is invalid: {e}")],
    }
}

/// Whether a `findByStatus` entry has this name and category id.
///
/// Listings contain pets with missing names or categories; those never match.
#[must_use]
pub fn matches_listing(pet: &Value, name: &str, category_id: i64) -> bool {
    let pet_name = pet.get("name").and_then(Value::as_str);
    let pet_category = pet
        .get("category")
        .and_then(|c| c.get("id"))
        .and_then(Value::as_i64);
    pet_name == Some(name) && pet_category == Some(category_id)
}

fn random_alnum(rng: &mut impl Rng, len: usize) -> String {
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    (0..len)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use serde_json::json;

    #[test]
    fn generated_names_are_prefixed_and_vary() {
        let mut rng = SmallRng::seed_from_u64(42);
        let a = generate_pet_name(&mut rng);
        let b = generate_pet_name(&mut rng);
        assert!(a.starts_with("restcheck-"));
        assert_eq!(a.len(), "restcheck-".len() + 10);
        assert_ne!(a, b);
    }

    #[test]
    fn new_pet_serializes_in_petstore_shape() {
        let value = serde_json::to_value(new_pet("rex")).unwrap();
        assert_eq!(value["name"], "rex");
        assert_eq!(value["status"], "available");
        assert_eq!(value["category"]["id"], 1);
        assert!(value["photoUrls"].is_array());
        assert_eq!(value["tags"][0]["name"], "restcheck");
    }

    #[test]
    fn echoed_pet_conforms() {
        let mut value = serde_json::to_value(new_pet("rex")).unwrap();
        value["id"] = json!(9_223_372_036_854_775_807_i64);
        assert!(shape_errors(&value).is_empty(), "{:?}", shape_errors(&value));
    }

    #[test]
    fn malformed_pet_reports_errors() {
        let errors = shape_errors(&json!({"name": 5, "status": "lost"}));
        assert!(!errors.is_empty());
    }

    #[test]
    fn listing_match_requires_name_and_category() {
        let pet = json!({"id": 1, "name": "doggie", "category": {"id": 12, "name": "dogs"}});
        assert!(matches_listing(&pet, "doggie", 12));
        assert!(!matches_listing(&pet, "doggie", 120));
        assert!(!matches_listing(&pet, "kitty", 12));
    }

    #[test]
    fn listing_entries_without_category_never_match() {
        assert!(!matches_listing(&json!({"name": "doggie"}), "doggie", 12));
        assert!(!matches_listing(&json!({"category": {"id": 12}}), "doggie", 12));
        assert!(!matches_listing(&json!("doggie"), "doggie", 12));
    }
}
