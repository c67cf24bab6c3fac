use copysmith::{
    logger::{self, LogLevel, LoggerConfig},
    AspectRatio, Config, ContentType, GeneratedImage, GenerationOrchestrator, InputParameters,
    TextOutcome, Tone,
};
use std::env;
use std::fs;

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Request parameters from `COPYSMITH_*` variables, falling back to a sample product.
fn params_from_env() -> Result<InputParameters, Box<dyn std::error::Error>> {
    let mut params = InputParameters::new(
        env_or("COPYSMITH_PRODUCT", "GlowUp Vitamin C Serum"),
        env_or(
            "COPYSMITH_DESCRIPTION",
            "Brightens skin, reduces dark spots, natural ingredients, vegan-friendly.",
        ),
        env_or(
            "COPYSMITH_AUDIENCE",
            "Women aged 25-45 interested in natural skincare.",
        ),
        env_or("COPYSMITH_CONTENT_TYPE", "Product Description").parse::<ContentType>()?,
        env_or("COPYSMITH_TONE", "Friendly").parse::<Tone>()?,
    );

    if env_or("COPYSMITH_GENERATE_IMAGE", "true") == "true" {
        let aspect_ratio = env_or("COPYSMITH_ASPECT_RATIO", "1:1").parse::<AspectRatio>()?;
        let image_count = env_or("COPYSMITH_IMAGE_COUNT", "1").parse::<u32>()?;
        params = params.with_images(aspect_ratio, image_count);
    }
    Ok(params)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let level = env::var("COPYSMITH_LOG")
        .ok()
        .and_then(|s| LogLevel::parse(&s))
        .unwrap_or(LogLevel::Info);
    logger::init_with_config(LoggerConfig::development().with_level(level))?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env()?;
    logger::log_config_info(&config);

    let backend = match copysmith::connect(&config).await {
        Ok(backend) => backend,
        Err(e) => {
            log::error!("❌ Failed to initialize generation backend: {}", e);
            return Err(e.into());
        }
    };
    let orchestrator = GenerationOrchestrator::with_config(backend, config.orchestrator.clone());

    let params = params_from_env()?;
    let result = orchestrator.generate(&params).await?;

    println!("Generated marketing copy ({}):", params.content_type);
    match &result.text {
        TextOutcome::Generated(text) => println!("{}\n", text),
        TextOutcome::Failed(info) => println!("text generation failed: {}\n", info),
    }

    for (index, image) in result.succeeded_images() {
        let filename = image.suggested_filename(&params, index);
        match fs::write(&filename, &image.bytes) {
            Ok(_) => println!(
                "{} saved to {} ({} bytes)",
                GeneratedImage::caption(&params, index),
                filename,
                image.bytes.len()
            ),
            Err(e) => log::error!("❌ Failed to save image {}: {}", filename, e),
        }
    }
    for index in result.failed_slots() {
        if let Some(info) = result.images[index].error() {
            println!("image {} failed: {}", index + 1, info);
        }
    }

    Ok(())
}
