use serde::{Deserialize, Serialize};

/// A point an agent can click, with the description of what is there.
///
/// Serialized as `{x, y, text, type, ariaLabel}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Target {
    /// Horizontal center in viewport CSS pixels
    pub x: f64,

    /// Vertical center in viewport CSS pixels
    pub y: f64,

    pub text: String,

    /// Lowercased tag name
    #[serde(rename = "type")]
    pub tag_name: String,

    #[serde(rename = "ariaLabel")]
    pub aria_label: String,
}

impl Target {
    /// Case-insensitive substring match against the target text
    pub fn text_contains(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// First target whose text contains `needle`, ignoring case
pub fn find_by_text<'a>(targets: &'a [Target], needle: &str) -> Option<&'a Target> {
    targets.iter().find(|target| target.text_contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(text: &str, tag: &str) -> Target {
        Target {
            x: 1.0,
            y: 2.0,
            text: text.to_string(),
            tag_name: tag.to_string(),
            aria_label: String::new(),
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(target("Convert", "button")).unwrap();
        assert_eq!(value["type"], "button");
        assert_eq!(value["ariaLabel"], "");
        assert_eq!(value["text"], "Convert");
        assert_eq!(value["x"], 1.0);
        assert!(value.get("tag_name").is_none());
    }

    #[test]
    fn test_find_by_text_ignores_case() {
        let targets = vec![target("Open file", "button"), target("Convert", "button")];
        assert_eq!(find_by_text(&targets, "convert").map(|t| t.text.as_str()), Some("Convert"));
        assert_eq!(find_by_text(&targets, "OPEN").map(|t| t.text.as_str()), Some("Open file"));
        assert!(find_by_text(&targets, "download").is_none());
    }

    #[test]
    fn test_find_by_text_returns_first_match() {
        let targets = vec![target("HD 720p", "li"), target("HD 720p", "option")];
        assert_eq!(find_by_text(&targets, "720p").map(|t| t.tag_name.as_str()), Some("li"));
    }
}
