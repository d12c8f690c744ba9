use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringOptions {
    pub multiline: bool,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatOptions {
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub round: f64,
    pub display: String,
}

/// Declared type of one node input, as the host UI reads it.
#[derive(Debug, Clone, PartialEq)]
pub enum InputKind {
    String(StringOptions),
    Float(FloatOptions),
    Image,
}

impl InputKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            InputKind::String(_) => "STRING",
            InputKind::Float(_) => "FLOAT",
            InputKind::Image => "IMAGE",
        }
    }
}

// Serialized as `[TYPE]` or `[TYPE, {options}]`.
impl Serialize for InputKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InputKind::String(opts) => {
                let mut tup = serializer.serialize_tuple(2)?;
                tup.serialize_element(self.type_name())?;
                tup.serialize_element(opts)?;
                tup.end()
            }
            InputKind::Float(opts) => {
                let mut tup = serializer.serialize_tuple(2)?;
                tup.serialize_element(self.type_name())?;
                tup.serialize_element(opts)?;
                tup.end()
            }
            InputKind::Image => {
                let mut tup = serializer.serialize_tuple(1)?;
                tup.serialize_element(self.type_name())?;
                tup.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    pub name: &'static str,
    pub kind: InputKind,
}

impl InputField {
    pub fn string(name: &'static str, default: impl Into<String>, multiline: bool) -> Self {
        Self {
            name,
            kind: InputKind::String(StringOptions {
                multiline,
                default: default.into(),
            }),
        }
    }

    pub fn image(name: &'static str) -> Self {
        Self {
            name,
            kind: InputKind::Image,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Fields(Vec<InputField>);

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for field in &self.0 {
            map.serialize_entry(field.name, &field.kind)?;
        }
        map.end()
    }
}

/// Input schema of a node, split into required and optional inputs.
/// Declaration order is kept in the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputTypes {
    required: Fields,
    optional: Fields,
}

impl InputTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, field: InputField) -> Self {
        self.required.0.push(field);
        self
    }

    pub fn optional(mut self, field: InputField) -> Self {
        self.optional.0.push(field);
        self
    }

    pub fn required_fields(&self) -> &[InputField] {
        &self.required.0
    }

    pub fn optional_fields(&self) -> &[InputField] {
        &self.optional.0
    }

    pub fn get(&self, name: &str) -> Option<&InputField> {
        self.required
            .0
            .iter()
            .chain(self.optional.0.iter())
            .find(|f| f.name == name)
    }
}
