use anyhow::Result;
use llm_api_node::config::NodeDefaults;
use llm_api_node::{ImageTensor, LlmApiNode, ProcessRequest};

// Usage: image2text [image.png] [prompt]
#[tokio::main]
async fn main() -> Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let mut args = std::env::args().skip(1);
    let image_path = args.next();
    let prompt = args.next();

    let mut request = ProcessRequest::from_defaults(&NodeDefaults::from_env()); // Run with env vars
    if let Some(prompt) = prompt {
        request.prompt = prompt;
    }
    if let Some(path) = image_path {
        let rgb = image::open(&path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let data = rgb.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();
        request = request.with_image(ImageTensor::new(
            vec![1, height as usize, width as usize, 3],
            data,
        )?);
    }

    let node = LlmApiNode::new();
    let output = node.process(&request).await;

    println!("Response: {}", output.response);
    Ok(())
}
