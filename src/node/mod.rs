pub mod registry;
pub mod schema;

use crate::config::{NodeDefaults, ProviderHeaders};
use crate::error::{LlmApiError, EXCEPTION_MESSAGE};
use crate::llm::openai::{ChatCompletionRequest, OpenAIClient};
use crate::tensor::ImageTensor;
use reqwest::Client;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task;
use schema::{FloatOptions, InputField, InputKind, InputTypes};

pub const RETURN_TYPES: [&str; 1] = ["STRING"];
pub const RETURN_NAMES: [&str; 1] = ["response"];
pub const FUNCTION: &str = "process";
pub const CATEGORY: &str = "LLM";

pub const TEMPERATURE_MIN: f64 = 0.0;
pub const TEMPERATURE_MAX: f64 = 2.0;

/// Inputs of one node invocation.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub prompt: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub api_key: String,
    pub image: Option<ImageTensor>,
}

impl ProcessRequest {
    pub fn from_defaults(defaults: &NodeDefaults) -> Self {
        Self {
            prompt: defaults.prompt.clone(),
            base_url: defaults.base_url.clone(),
            model: defaults.model.clone(),
            temperature: defaults.temperature,
            api_key: defaults.api_key.clone(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageTensor) -> Self {
        self.image = Some(image);
        self
    }
}

/// The node's single `response` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOutput {
    pub response: String,
}

pub struct LlmApiNode {
    client: Client,
    headers: ProviderHeaders,
}

impl LlmApiNode {
    pub fn new() -> Self {
        Self::with_headers(ProviderHeaders::from_env())
    }

    pub fn with_headers(headers: ProviderHeaders) -> Self {
        Self {
            client: Client::new(),
            headers,
        }
    }

    pub fn input_types() -> InputTypes {
        Self::input_types_with(&NodeDefaults::from_env())
    }

    pub fn input_types_with(defaults: &NodeDefaults) -> InputTypes {
        InputTypes::new()
            .required(InputField::string("prompt", &defaults.prompt, true))
            .required(InputField::string("base_url", &defaults.base_url, false))
            .required(InputField::string("api_key", &defaults.api_key, false))
            .required(InputField::string("model", &defaults.model, false))
            .required(InputField {
                name: "temperature",
                kind: InputKind::Float(FloatOptions {
                    default: defaults.temperature,
                    min: TEMPERATURE_MIN,
                    max: TEMPERATURE_MAX,
                    step: 0.1,
                    round: 0.1,
                    display: "slider".to_string(),
                }),
            })
            .optional(InputField::image("image"))
    }

    /// Runs one request and returns the generated text or the typed failure.
    /// Status and parse failures are logged by the client; everything else is
    /// logged here.
    pub async fn try_process(&self, request: &ProcessRequest) -> Result<String, LlmApiError> {
        if request.api_key.is_empty() {
            return Err(LlmApiError::MissingApiKey);
        }

        let png = match &request.image {
            Some(image) => Some(image.to_png().inspect_err(|err| {
                log::error!("{}", exception_report(err, &request.base_url, None));
            })?),
            None => None,
        };

        let payload = ChatCompletionRequest::new(
            &request.model,
            &request.prompt,
            png.as_deref(),
            request.temperature,
        );

        OpenAIClient::new(
            self.client.clone(),
            &request.base_url,
            &request.api_key,
            self.headers.clone(),
        )
        .create_chat_completion(&payload)
        .await
        .inspect_err(|err| {
            if matches!(err, LlmApiError::RequestError(_)) {
                log::error!(
                    "{}",
                    exception_report(err, &request.base_url, Some(&payload))
                );
            }
        })
    }

    /// Host entry point. Failures come back as a short `Error: ...` string.
    pub async fn process(&self, request: &ProcessRequest) -> NodeOutput {
        let response = match self.try_process(request).await {
            Ok(content) => content,
            Err(err) => err.user_message(),
        };
        NodeOutput { response }
    }

    /// Same as [`LlmApiNode::process`] for hosts that call synchronously.
    ///
    /// Inside a multi-thread tokio runtime the call blocks the current worker
    /// via `block_in_place`. A current-thread runtime cannot be blocked on, so
    /// that case returns the exception string.
    pub fn process_blocking(&self, request: &ProcessRequest) -> NodeOutput {
        if let Ok(handle) = Handle::try_current() {
            return match handle.runtime_flavor() {
                RuntimeFlavor::MultiThread => {
                    task::block_in_place(|| handle.block_on(self.process(request)))
                }
                flavor => {
                    log::error!(
                        "Exception occurred during API call:\nError: process_blocking called on a {flavor:?} runtime\nRequest URL: {}",
                        request.base_url
                    );
                    exception_output()
                }
            };
        }

        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime.block_on(self.process(request)),
            Err(e) => {
                log::error!("Exception occurred during API call:\nError: {e}");
                exception_output()
            }
        }
    }
}

fn exception_output() -> NodeOutput {
    NodeOutput {
        response: EXCEPTION_MESSAGE.to_string(),
    }
}

fn exception_report(
    err: &LlmApiError,
    base_url: &str,
    payload: Option<&ChatCompletionRequest>,
) -> String {
    let data = payload
        .map(ChatCompletionRequest::redacted)
        .unwrap_or_else(|| "<not built>".to_string());
    format!(
        "Exception occurred during API call:\nError: {err:?}\nRequest URL: {base_url}\nRequest data: {data}"
    )
}

impl Default for LlmApiNode {
    fn default() -> Self {
        Self::new()
    }
}
