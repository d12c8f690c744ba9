use super::schema::InputTypes;
use super::{LlmApiNode, CATEGORY, FUNCTION, RETURN_NAMES, RETURN_TYPES};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const LLM_API_NODE_ID: &str = "LLMAPINode";
pub const LLM_API_NODE_DISPLAY_NAME: &str = "LLM API";

/// What the host needs to list a node and build its widgets.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDescriptor {
    pub display_name: &'static str,
    pub category: &'static str,
    pub function: &'static str,
    pub input: InputTypes,
    pub output: Vec<&'static str>,
    pub output_name: Vec<&'static str>,
}

pub fn node_class_mappings() -> BTreeMap<&'static str, NodeDescriptor> {
    let mut mappings = BTreeMap::new();
    mappings.insert(
        LLM_API_NODE_ID,
        NodeDescriptor {
            display_name: LLM_API_NODE_DISPLAY_NAME,
            category: CATEGORY,
            function: FUNCTION,
            input: LlmApiNode::input_types(),
            output: RETURN_TYPES.to_vec(),
            output_name: RETURN_NAMES.to_vec(),
        },
    );
    mappings
}

pub fn node_display_name_mappings() -> BTreeMap<&'static str, &'static str> {
    node_class_mappings()
        .into_iter()
        .map(|(id, descriptor)| (id, descriptor.display_name))
        .collect()
}

/// JSON object keyed by node id, for hosts that load node metadata as data.
pub fn manifest() -> Result<Value, serde_json::Error> {
    let mut out = Map::new();
    for (id, descriptor) in node_class_mappings() {
        out.insert(id.to_string(), serde_json::to_value(descriptor)?);
    }
    Ok(Value::Object(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_mappings() {
        let mappings = node_class_mappings();
        assert_eq!(mappings.len(), 1);
        let descriptor = &mappings["LLMAPINode"];
        assert_eq!(descriptor.category, "LLM");
        assert_eq!(descriptor.function, "process");
        assert!(descriptor.input.get("temperature").is_some());
    }

    #[test]
    fn test_display_name_mappings() {
        let names = node_display_name_mappings();
        assert_eq!(names.get("LLMAPINode"), Some(&"LLM API"));
    }

    #[test]
    fn test_manifest() {
        let manifest = manifest().unwrap();
        let node = &manifest["LLMAPINode"];
        assert_eq!(node["display_name"], "LLM API");
        assert_eq!(node["output"][0], "STRING");
        assert_eq!(node["output_name"][0], "response");
        assert_eq!(node["input"]["optional"]["image"][0], "IMAGE");
    }

    #[test]
    fn test_manifest_temperature_options_are_exact() {
        let manifest = manifest().unwrap();
        let options = &manifest["LLMAPINode"]["input"]["required"]["temperature"][1];
        assert_eq!(options["default"], 0.7);
        assert_eq!(options["min"], 0.0);
        assert_eq!(options["max"], 2.0);
        assert_eq!(options["step"], 0.1);
        assert_eq!(options["round"], 0.1);

        let text = serde_json::to_string(&manifest).unwrap();
        assert!(text.contains(r#""default":0.7"#));
        assert!(text.contains(r#""step":0.1"#));
    }
}
