use base64::{engine::general_purpose::STANDARD, Engine};

pub fn base64_encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", base64_encode(png))
}

/// Shortens long strings for log output. Used to keep data URLs out of the console.
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...[{} bytes]", &text[..idx], text.len()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_data_url() {
        let url = png_data_url(b"png");
        assert_eq!(url, "data:image/png;base64,cG5n");
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("abcdefgh", 3), "abc...[8 bytes]");
    }
}
