use crate::config::ProviderHeaders;
use crate::error::LlmApiError;
use crate::utils::{png_data_url, truncate_for_log};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageUrl {
    pub url: String,
}

// Example format:
// "content": [
//   {
//     "type": "text",
//     "text": "Describe this image:",
//     "image_url": {"url": "data:image/png;base64,{base64_image}"}
//   }
// ]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<ImageUrl>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentItem>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    message: ResponseMessage,
}

/// Only the fields the node reads; everything else in the body is ignored.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    pub fn into_content(self) -> Option<String> {
        self.choices.into_iter().next().map(|c| c.message.content)
    }
}

impl ChatCompletionRequest {
    /// Text-only prompts go out as a plain string; with an image the prompt and
    /// the data URL share a single content block.
    pub fn new(model: &str, prompt: &str, png: Option<&[u8]>, temperature: f64) -> Self {
        let content = match png {
            Some(bytes) => MessageContent::Parts(vec![ContentItem {
                content_type: "text".to_string(),
                text: prompt.to_string(),
                image_url: Some(ImageUrl {
                    url: png_data_url(bytes),
                }),
            }]),
            None => MessageContent::Text(prompt.to_string()),
        };

        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
            temperature,
        }
    }

    /// Debug rendering of the payload with data URLs shortened.
    pub fn redacted(&self) -> String {
        let mut copy = self.clone();
        for message in copy.messages.iter_mut() {
            if let MessageContent::Parts(parts) = &mut message.content {
                for part in parts.iter_mut() {
                    if let Some(image_url) = part.image_url.as_mut() {
                        image_url.url = truncate_for_log(&image_url.url, 48);
                    }
                }
            }
        }
        serde_json::to_string(&copy).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }
}

pub struct OpenAIClient {
    client: Client,
    base_url: String,
    api_key: String,
    headers: ProviderHeaders,
}

impl OpenAIClient {
    pub fn new(client: Client, base_url: &str, api_key: &str, headers: ProviderHeaders) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            headers,
        }
    }

    /// Posts the payload to `base_url` as-is and returns
    /// `choices[0].message.content`.
    pub async fn create_chat_completion(
        &self,
        payload: &ChatCompletionRequest,
    ) -> Result<String, LlmApiError> {
        log::debug!("POST {} (model {})", self.base_url, payload.model);

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.headers.referer)
            .header("X-Title", &self.headers.title)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            log::error!(
                "API call failed:\nStatus code: {}\nResponse: {}\nRequest URL: {}\nRequest data: {}",
                status.as_u16(),
                body,
                self.base_url,
                payload.redacted()
            );
            return Err(LlmApiError::ApiError { status, body });
        }

        match parse_content(&body) {
            Ok(content) => Ok(content),
            Err(message) => {
                log::error!(
                    "Failed to parse API response:\nStatus code: {}\nResponse text: {}\nError: {}",
                    status.as_u16(),
                    body,
                    message
                );
                Err(LlmApiError::ParseError {
                    status,
                    body,
                    message,
                })
            }
        }
    }
}

fn parse_content(body: &str) -> Result<String, String> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| e.to_string())?;
    response
        .into_content()
        .ok_or_else(|| "response has no choices".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_only_payload() {
        let payload = ChatCompletionRequest::new("test-model", "Hello", None, 0.5);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "test-model",
                "messages": [{"role": "user", "content": "Hello"}],
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn test_image_payload() {
        let payload = ChatCompletionRequest::new("test-model", "What is this?", Some(b"png"), 0.0);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value["messages"][0]["content"],
            json!([{
                "type": "text",
                "text": "What is this?",
                "image_url": {"url": "data:image/png;base64,cG5n"}
            }])
        );
    }

    #[test]
    fn test_redacted_shortens_data_url() {
        let png = vec![7u8; 4096];
        let payload = ChatCompletionRequest::new("m", "p", Some(&png), 0.7);
        let redacted = payload.redacted();
        assert!(redacted.contains("data:image/png;base64,"));
        assert!(redacted.len() < 512);
    }

    #[test]
    fn test_parse_content() {
        let body = json!({
            "id": "gen-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi"}}]
        })
        .to_string();
        assert_eq!(parse_content(&body).unwrap(), "Hi");
    }

    #[test]
    fn test_parse_content_rejects_bad_shapes() {
        assert!(parse_content("not json").is_err());
        assert!(parse_content(r#"{"invalid": "response format"}"#).is_err());
        assert!(parse_content(r#"{"choices": []}"#).is_err());
        assert!(parse_content(r#"{"choices": [{"message": {"content": null}}]}"#).is_err());
    }
}
