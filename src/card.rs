use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A card as the remote API returns it. Only the fields we project are
/// kept, and a field of the wrong JSON type reads as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCard {
    pub id: Option<String>,
    pub name: Option<String>,
    pub images: Option<CardImages>,
    pub types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardImages {
    pub small: Option<String>,
}

impl From<&Value> for RawCard {
    fn from(value: &Value) -> Self {
        RawCard {
            id: string_field(value, "id"),
            name: string_field(value, "name"),
            images: value.get("images").filter(|v| v.is_object()).map(|images| CardImages {
                small: string_field(images, "small"),
            }),
            types: value.get("types").and_then(string_list),
        }
    }
}

/// Body of one page of the collection endpoint. Cards stay as loose JSON
/// until reduced so one odd record can't sink the page.
#[derive(Debug, Default, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

impl PageResponse {
    pub fn into_cards(self) -> Vec<RawCard> {
        self.data.unwrap_or_default().iter().map(RawCard::from).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReducedCard {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub types: Vec<String>,
}

/// On-disk shape of the output file. Entries are read one by one.
#[derive(Debug, Deserialize)]
pub struct StoredFile {
    pub data: Vec<Value>,
}

impl ReducedCard {
    /// Projects a raw card onto the minimal schema. Cards without a usable
    /// id can't be deduplicated and come back as `None`.
    pub fn reduce(raw: &RawCard) -> Option<ReducedCard> {
        let id = raw.id.as_deref().filter(|id| !id.is_empty())?;
        Some(ReducedCard {
            id: id.to_string(),
            name: raw.name.clone(),
            image: raw.images.as_ref().and_then(|images| images.small.clone()),
            types: raw.types.clone().unwrap_or_default(),
        })
    }

    /// Reads back one entry of the output file.
    pub fn from_stored(value: &Value) -> Option<ReducedCard> {
        let id = string_field(value, "id").filter(|id| !id.is_empty())?;
        Some(ReducedCard {
            id,
            name: string_field(value, "name"),
            image: string_field(value, "image"),
            types: value.get("types").and_then(string_list).unwrap_or_default(),
        })
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

// Non-string entries are skipped.
fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawCard {
        RawCard::from(&value)
    }

    #[test]
    fn projects_four_fields() {
        let card = raw(json!({
            "id": "xy1-1",
            "name": "Venusaur-EX",
            "supertype": "Pokémon",
            "images": { "small": "https://img/xy1-1.png", "large": "https://img/xy1-1_hires.png" },
            "types": ["Grass"],
            "hp": "180"
        }));
        let reduced = ReducedCard::reduce(&card).unwrap();
        assert_eq!(
            reduced,
            ReducedCard {
                id: "xy1-1".to_string(),
                name: Some("Venusaur-EX".to_string()),
                image: Some("https://img/xy1-1.png".to_string()),
                types: vec!["Grass".to_string()],
            }
        );
    }

    #[test]
    fn reduction_is_idempotent() {
        let card = raw(json!({ "id": "a", "name": "A", "types": ["Fire", "Water"] }));
        assert_eq!(ReducedCard::reduce(&card), ReducedCard::reduce(&card));
    }

    #[test]
    fn missing_images_and_types_are_tolerated() {
        let reduced = ReducedCard::reduce(&raw(json!({ "id": "trainer-1", "name": "Potion" }))).unwrap();
        assert_eq!(reduced.image, None);
        assert!(reduced.types.is_empty());

        let reduced =
            ReducedCard::reduce(&raw(json!({ "id": "t2", "images": null, "types": null }))).unwrap();
        assert_eq!(reduced.name, None);
        assert_eq!(reduced.image, None);
        assert!(reduced.types.is_empty());

        let reduced = ReducedCard::reduce(&raw(json!({ "id": "t3", "images": {} }))).unwrap();
        assert_eq!(reduced.image, None);
    }

    #[test]
    fn cards_without_id_are_dropped() {
        assert!(ReducedCard::reduce(&raw(json!({ "name": "Nameless" }))).is_none());
        assert!(ReducedCard::reduce(&raw(json!({ "id": "", "name": "Blank" }))).is_none());
        assert!(ReducedCard::reduce(&raw(json!({ "id": null }))).is_none());
    }

    #[test]
    fn page_without_data_is_empty() {
        let page: PageResponse = serde_json::from_str(r#"{ "page": 9, "count": 0 }"#).unwrap();
        assert!(page.into_cards().is_empty());
        let page: PageResponse = serde_json::from_str(r#"{ "data": null }"#).unwrap();
        assert!(page.into_cards().is_empty());
    }

    #[test]
    fn mistyped_fields_do_not_sink_the_page() {
        let page: PageResponse = serde_json::from_value(json!({
            "data": [
                { "id": "a", "name": "Alpha", "types": ["Grass"] },
                { "id": "b", "name": 7, "images": "not-an-object" },
                { "id": "c", "types": ["Grass", null, 3, "Water"] },
                { "id": 42, "name": "Numeric id" },
                "not a card"
            ]
        }))
        .unwrap();
        let reduced: Vec<ReducedCard> = page.into_cards().iter().filter_map(ReducedCard::reduce).collect();

        let ids: Vec<&str> = reduced.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(reduced[1].name, None);
        assert_eq!(reduced[1].image, None);
        assert_eq!(reduced[2].types, vec!["Grass".to_string(), "Water".to_string()]);
    }

    #[test]
    fn stored_entries_read_back_leniently() {
        let card = ReducedCard::from_stored(&json!({ "id": "a", "name": "A", "image": "a.png" })).unwrap();
        assert_eq!(card.image.as_deref(), Some("a.png"));
        assert!(card.types.is_empty());
        assert!(ReducedCard::from_stored(&json!({ "id": null, "name": "Ghost" })).is_none());
        assert!(ReducedCard::from_stored(&json!(["a"])).is_none());
    }

    #[test]
    fn reduced_card_serializes_in_stable_field_order() {
        let card = ReducedCard {
            id: "sm1-1".to_string(),
            name: Some("Caterpie".to_string()),
            image: None,
            types: vec![],
        };
        assert_eq!(
            serde_json::to_string(&card).unwrap(),
            r#"{"id":"sm1-1","name":"Caterpie","image":null,"types":[]}"#
        );
    }
}
