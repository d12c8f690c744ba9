//! Graph node that sends a prompt, and optionally an image, to an
//! OpenAI-compatible chat completion endpoint and returns the reply text.

pub mod config;
pub mod error;
pub mod llm;
pub mod node;
pub mod tensor;
pub mod utils;

pub use error::LlmApiError;
pub use node::registry::{manifest, node_class_mappings, node_display_name_mappings};
pub use node::{LlmApiNode, NodeOutput, ProcessRequest};
pub use tensor::ImageTensor;
