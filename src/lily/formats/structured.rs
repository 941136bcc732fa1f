//! Machine-readable output through serde
//!
//! Both formats serialize the same shape: the root node (kind, byte span, children with
//! optional field labels, `extra` flag when set) and the parse stats.

use super::registry::{FormatError, Formatter};
use crate::lily::ast::SyntaxTree;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, tree: &SyntaxTree) -> Result<String, FormatError> {
        serde_json::to_string_pretty(tree)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Pretty-printed JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, tree: &SyntaxTree) -> Result<String, FormatError> {
        serde_yaml::to_string(tree).map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "YAML"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lily::parsing::parse;
    use serde_json::Value;

    #[test]
    fn test_json_carries_fields_spans_and_extras() {
        let tree = parse("{ c4 % hi\n}").unwrap();
        let json: Value = serde_json::from_str(&JsonFormatter.serialize(&tree).unwrap()).unwrap();

        let root = &json["root"];
        assert_eq!(root["kind"], "source_file");
        let music = &root["children"][0];
        assert_eq!(music["kind"], "music");
        let note = &music["children"][0];
        assert_eq!(note["span"]["start"], 2);
        assert_eq!(note["span"]["end"], 4);
        assert_eq!(note["children"][0]["field"], "name");
        let comment = &music["children"][1];
        assert_eq!(comment["kind"], "comment");
        assert_eq!(comment["extra"], true);
        assert!(note.get("extra").is_none());
        assert!(json["stats"]["steps"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_yaml_output() {
        let tree = parse("{ r }").unwrap();
        let yaml = YamlFormatter.serialize(&tree).unwrap();
        assert!(yaml.contains("kind: source_file"));
        assert!(yaml.contains("kind: rest"));
        assert!(yaml.contains("max_depth:"));
    }
}
