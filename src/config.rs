use std::env;

pub const DEFAULT_PROMPT: &str = "Describe this image:";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_REFERER: &str = "https://openrouter.ai/";
pub const DEFAULT_TITLE: &str = "ComfyUI LLM API Node";

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const REFERER_ENV: &str = "LLM_API_NODE_REFERER";
pub const TITLE_ENV: &str = "LLM_API_NODE_TITLE";

/// Values shown in the host UI before the user edits anything.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDefaults {
    pub prompt: String,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
}

impl NodeDefaults {
    /// The api key is only ever a default here; an unset variable yields "".
    fn get_or_load_key(key: Option<&str>) -> String {
        match key {
            Some(val) => val.to_string(),
            None => env::var(API_KEY_ENV).unwrap_or_default(),
        }
    }

    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: Self::get_or_load_key(api_key),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn from_env() -> Self {
        Self::new(None)
    }
}

/// Static headers OpenRouter requires on every request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderHeaders {
    pub referer: String,
    pub title: String,
}

impl ProviderHeaders {
    fn get_or_load(value: Option<&str>, var: &str, default: &str) -> String {
        match value {
            Some(val) => val.to_string(),
            None => env::var(var).unwrap_or_else(|_| default.to_string()),
        }
    }

    pub fn new(referer: Option<&str>, title: Option<&str>) -> Self {
        Self {
            referer: Self::get_or_load(referer, REFERER_ENV, DEFAULT_REFERER),
            title: Self::get_or_load(title, TITLE_ENV, DEFAULT_TITLE),
        }
    }

    pub fn from_env() -> Self {
        Self::new(None, None)
    }
}

impl Default for ProviderHeaders {
    fn default() -> Self {
        Self {
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_wins() {
        let defaults = NodeDefaults::new(Some("sk-test"));
        assert_eq!(defaults.api_key, "sk-test");
        assert_eq!(defaults.base_url, DEFAULT_BASE_URL);
        assert_eq!(defaults.model, DEFAULT_MODEL);
        assert_eq!(defaults.temperature, 0.7);
    }

    #[test]
    fn test_explicit_headers_win() {
        let headers = ProviderHeaders::new(Some("https://example.com/"), Some("Test"));
        assert_eq!(headers.referer, "https://example.com/");
        assert_eq!(headers.title, "Test");
    }

    #[test]
    fn test_default_headers() {
        let headers = ProviderHeaders::default();
        assert_eq!(headers.referer, "https://openrouter.ai/");
        assert_eq!(headers.title, "ComfyUI LLM API Node");
    }
}
