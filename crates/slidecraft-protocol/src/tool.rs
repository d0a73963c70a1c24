//! Tool declaration advertised to the model.

use serde_json::{Value, json};

/// Name of the single callable tool.
pub const GENERATE_PRESENTATION: &str = "generate_presentation";

/// Authoritative schema for the `generate_presentation` tool.
///
/// `topic` and `slide_data` are required; slide titles and bullet lists are
/// optional per slide.
pub fn generate_presentation_tool() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": GENERATE_PRESENTATION,
            "description": "Generate powerpoint presentation slides",
            "parameters": {
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "Topic of the presentation",
                    },
                    "slide_data": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "title": {
                                    "type": "string",
                                    "description": "Title of the slide",
                                },
                                "content": {
                                    "type": "array",
                                    "items": {
                                        "type": "string",
                                        "description": "Content for one bullet point",
                                    },
                                    "description": "An array of main contents of the slide",
                                },
                            },
                        },
                        "description": "An array of slide contents",
                    },
                },
                "required": ["topic", "slide_data"],
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tool_schema_declares_required_fields() {
        let tool = generate_presentation_tool();
        assert_eq!(tool["type"], "function");
        assert_eq!(tool["function"]["name"], GENERATE_PRESENTATION);
        assert_eq!(
            tool["function"]["parameters"]["required"],
            json!(["topic", "slide_data"])
        );
        let slide_items = &tool["function"]["parameters"]["properties"]["slide_data"]["items"];
        assert_eq!(slide_items["properties"]["content"]["type"], "array");
    }
}
