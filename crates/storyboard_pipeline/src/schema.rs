//! Response schemas sent with the text-stage requests.
//!
//! Gemini accepts an OpenAPI subset with upper-case type names.

use serde_json::{Value, json};

/// Schema for the concept stage: `{story, screenplay}`.
pub fn concept_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "story": {
                "type": "STRING",
                "description": "A short narrative summary of the developed story."
            },
            "screenplay": {
                "type": "STRING",
                "description": "The screenplay, one numbered beat per line."
            }
        },
        "required": ["story", "screenplay"]
    })
}

/// Schema for the structure stage: title, roster and the page grid.
pub fn storyboard_schema() -> Value {
    let character = json!({
        "type": "OBJECT",
        "properties": {
            "id": {"type": "STRING"},
            "name": {"type": "STRING"},
            "description": {
                "type": "STRING",
                "description": "Minimalist silhouette or mannequin-style appearance."
            }
        },
        "required": ["id", "name", "description"]
    });

    let scene = json!({
        "type": "OBJECT",
        "properties": {
            "id": {"type": "STRING"},
            "sceneNumber": {"type": "INTEGER"},
            "location": {"type": "STRING"},
            "timeOfDay": {"type": "STRING"},
            "action": {"type": "STRING"},
            "dialogue": {"type": "STRING"},
            "visualPrompt": {
                "type": "STRING",
                "description": "Self-contained prompt sufficient to illustrate this panel alone."
            }
        },
        "required": ["id", "sceneNumber", "location", "timeOfDay", "action", "visualPrompt"]
    });

    let page = json!({
        "type": "OBJECT",
        "properties": {
            "id": {"type": "STRING"},
            "pageNumber": {"type": "INTEGER"},
            "pageLayoutDescription": {"type": "STRING"},
            "scenes": {"type": "ARRAY", "items": scene}
        },
        "required": ["id", "pageNumber", "pageLayoutDescription", "scenes"]
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "title": {"type": "STRING"},
            "characters": {"type": "ARRAY", "items": character},
            "pages": {"type": "ARRAY", "items": page}
        },
        "required": ["title", "characters", "pages"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storyboard_schema_nests_scenes_in_pages() {
        let schema = storyboard_schema();
        let scene = &schema["properties"]["pages"]["items"]["properties"]["scenes"]["items"];
        assert_eq!(scene["properties"]["visualPrompt"]["type"], "STRING");
        let required = scene["required"].as_array().unwrap();
        assert!(!required.iter().any(|f| f == "dialogue"));
    }

    #[test]
    fn concept_schema_requires_both_fields() {
        assert_eq!(concept_schema()["required"], json!(["story", "screenplay"]));
    }
}
