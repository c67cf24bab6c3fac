//! Runs one generation request end to end.
//!
//! Input is validated up front and is the only way `generate` can fail.
//! After that every backend call gets its own slot in the result; a failed,
//! slow or empty call is recorded there and never affects its siblings.

use crate::{
    backend::{BackendResult, GenerationBackend},
    config::{ImageDispatch, OrchestratorConfig},
    error::{BackendError, ValidationError},
    logger,
    models::{
        ErrorInfo, GenerationResult, ImageOutcome, InputParameters, PromptSet, TextOutcome,
    },
    prompt::PromptBuilder,
};
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone)]
pub struct GenerationOrchestrator {
    backend: Arc<dyn GenerationBackend>,
    builder: PromptBuilder,
    config: OrchestratorConfig,
}

impl GenerationOrchestrator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self::with_config(backend, OrchestratorConfig::default())
    }

    pub fn with_config(backend: Arc<dyn GenerationBackend>, config: OrchestratorConfig) -> Self {
        Self {
            backend,
            builder: PromptBuilder::new().with_max_field_chars(config.max_field_chars),
            config,
        }
    }

    pub async fn generate(
        &self,
        params: &InputParameters,
    ) -> Result<GenerationResult, ValidationError> {
        params.validate().map_err(|e| {
            log::warn!("Rejected generation request: {}", e);
            e
        })?;

        let request_id = Uuid::new_v4().to_string();
        let _timer = logger::timer(&format!("request {}", request_id));
        let prompts = self.builder.build(params);
        let image_count = params.requested_images();

        log::info!(
            "[{}] Generating {} for '{}' via {} ({} image(s))",
            request_id,
            params.content_type,
            params.product_name.trim(),
            self.backend.name(),
            image_count
        );
        log::debug!("[{}] Text prompt: {}", request_id, prompts.text_prompt);

        let (text, images) = match self.config.image_dispatch {
            ImageDispatch::Sequential => {
                let text = self.text_slot(&prompts).await;
                let mut images = Vec::with_capacity(image_count);
                for index in 0..image_count {
                    images.push(self.image_slot(&prompts, index).await);
                }
                (text, images)
            }
            ImageDispatch::Concurrent => {
                let image_calls = (0..image_count).map(|index| self.image_slot(&prompts, index));
                futures::join!(self.text_slot(&prompts), join_all(image_calls))
            }
        };

        let result = GenerationResult {
            request_id,
            text,
            images,
        };
        for line in result.describe_failures() {
            log::warn!("[{}] {}", result.request_id, line);
        }
        Ok(result)
    }

    async fn text_slot(&self, prompts: &PromptSet) -> TextOutcome {
        let call = self.backend.text_generate(&prompts.text_prompt);
        match with_timeout(self.config.call_timeout, call).await {
            Ok(text) if !text.trim().is_empty() => TextOutcome::Generated(text),
            Ok(_) => TextOutcome::Failed(BackendError::empty("text").into()),
            Err(e) => TextOutcome::Failed(ErrorInfo::from(e)),
        }
    }

    async fn image_slot(&self, prompts: &PromptSet, index: usize) -> ImageOutcome {
        let Some(prompt) = prompts.image_prompt.as_deref() else {
            return ImageOutcome::Failed(BackendError::empty("image prompt").into());
        };

        log::debug!("Requesting image {}", index + 1);
        match with_timeout(self.config.call_timeout, self.backend.image_generate(prompt)).await {
            Ok(image) if !image.bytes.is_empty() => ImageOutcome::Generated(image),
            Ok(_) => ImageOutcome::Failed(BackendError::empty("image bytes").into()),
            Err(e) => ImageOutcome::Failed(ErrorInfo::from(e)),
        }
    }
}

async fn with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = BackendResult<T>>,
) -> BackendResult<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(outcome) => outcome,
        Err(_) => Err(BackendError::timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{AspectRatio, ContentType, GeneratedImage, Tone};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    type Scripted<T> = (Duration, BackendResult<T>);

    struct StubBackend {
        text: Scripted<String>,
        images: Vec<Scripted<GeneratedImage>>,
        text_calls: AtomicUsize,
        image_calls: AtomicUsize,
        image_prompts: Mutex<Vec<String>>,
    }

    impl StubBackend {
        fn new() -> Self {
            Self {
                text: (Duration::ZERO, Ok("Sip happens.".to_string())),
                images: Vec::new(),
                text_calls: AtomicUsize::new(0),
                image_calls: AtomicUsize::new(0),
                image_prompts: Mutex::new(Vec::new()),
            }
        }

        fn with_text(mut self, delay: Duration, outcome: BackendResult<String>) -> Self {
            self.text = (delay, outcome);
            self
        }

        /// Outcome for the next image call, in call order.
        fn then_image(mut self, delay: Duration, outcome: BackendResult<GeneratedImage>) -> Self {
            self.images.push((delay, outcome));
            self
        }

        fn calls(&self) -> usize {
            self.text_calls.load(Ordering::SeqCst) + self.image_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationBackend for StubBackend {
        async fn text_generate(&self, _prompt: &str) -> BackendResult<String> {
            self.text_calls.fetch_add(1, Ordering::SeqCst);
            let (delay, outcome) = self.text.clone();
            tokio::time::sleep(delay).await;
            outcome
        }

        async fn image_generate(&self, prompt: &str) -> BackendResult<GeneratedImage> {
            let call = self.image_calls.fetch_add(1, Ordering::SeqCst);
            self.image_prompts.lock().unwrap().push(prompt.to_string());
            let (delay, outcome) = self
                .images
                .get(call)
                .cloned()
                .unwrap_or((Duration::ZERO, Ok(fixed_image())));
            tokio::time::sleep(delay).await;
            outcome
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn fixed_image() -> GeneratedImage {
        GeneratedImage::new(vec![0x89, b'P', b'N', b'G'], "image/png")
    }

    fn image_with(byte: u8) -> GeneratedImage {
        GeneratedImage::new(vec![byte], "image/png")
    }

    fn eco_bottle() -> InputParameters {
        InputParameters::new(
            "EcoBottle",
            "reusable insulated water bottle",
            "eco-conscious millennials",
            ContentType::AdHeadline,
            Tone::Playful,
        )
    }

    fn orchestrator(stub: &Arc<StubBackend>, config: OrchestratorConfig) -> GenerationOrchestrator {
        GenerationOrchestrator::with_config(stub.clone(), config)
    }

    #[tokio::test]
    async fn test_text_only_request_has_no_image_slots() {
        let stub = Arc::new(StubBackend::new());
        let result = orchestrator(&stub, OrchestratorConfig::new())
            .generate(&eco_bottle())
            .await
            .unwrap();

        assert_eq!(result.text, TextOutcome::Generated("Sip happens.".to_string()));
        assert!(result.images.is_empty());
        assert_eq!(stub.image_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_two_widescreen_images_from_stub() {
        let stub = Arc::new(StubBackend::new());
        let params = eco_bottle().with_images(AspectRatio::Widescreen, 2);
        let result = orchestrator(&stub, OrchestratorConfig::new())
            .generate(&params)
            .await
            .unwrap();

        assert_eq!(result.images.len(), 2);
        for outcome in &result.images {
            assert_eq!(outcome.image(), Some(&fixed_image()));
        }
        assert!(result.is_complete_success());

        let prompts = stub.image_prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], prompts[1]);
        assert!(prompts[0].contains("16:9"));
    }

    #[tokio::test]
    async fn test_invalid_image_count_makes_no_backend_calls() {
        for count in [0, 3, 10] {
            let stub = Arc::new(StubBackend::new());
            let params = eco_bottle().with_images(AspectRatio::Square, count);
            let err = orchestrator(&stub, OrchestratorConfig::new())
                .generate(&params)
                .await
                .unwrap_err();

            assert_eq!(err, ValidationError::ImageCountOutOfRange(count));
            assert_eq!(stub.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_blank_field_makes_no_backend_calls() {
        let stub = Arc::new(StubBackend::new());
        let mut params = eco_bottle();
        params.product_name = " \t".to_string();
        let err = orchestrator(&stub, OrchestratorConfig::new())
            .generate(&params)
            .await
            .unwrap_err();

        assert_eq!(err, ValidationError::EmptyField("product name"));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_first_image_does_not_affect_second_or_text() {
        let stub = Arc::new(
            StubBackend::new()
                .then_image(
                    Duration::ZERO,
                    Err(BackendError::new(ErrorKind::RateLimited, "quota exceeded")),
                )
                .then_image(Duration::ZERO, Ok(image_with(2))),
        );
        let params = eco_bottle().with_images(AspectRatio::Square, 2);
        let result = orchestrator(&stub, OrchestratorConfig::new())
            .generate(&params)
            .await
            .unwrap();

        assert_eq!(result.text.value(), Some("Sip happens."));
        assert_eq!(
            result.images[0].error(),
            Some(&ErrorInfo {
                kind: ErrorKind::RateLimited,
                message: "quota exceeded".to_string()
            })
        );
        assert_eq!(result.images[1].image(), Some(&image_with(2)));
        assert_eq!(result.failed_slots(), vec![0]);
    }

    #[tokio::test]
    async fn test_failed_text_keeps_images() {
        let stub = Arc::new(StubBackend::new().with_text(
            Duration::ZERO,
            Err(BackendError::new(ErrorKind::Auth, "API key not valid")),
        ));
        let params = eco_bottle().with_images(AspectRatio::Portrait, 1);
        let result = orchestrator(&stub, OrchestratorConfig::new())
            .generate(&params)
            .await
            .unwrap();

        assert_eq!(result.text.error().map(|e| e.kind), Some(ErrorKind::Auth));
        assert_eq!(result.images.len(), 1);
        assert!(result.images[0].image().is_some());
        assert_eq!(
            result.describe_failures(),
            vec!["text generation failed: API key not valid (auth)".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_text_is_a_failure() {
        let stub = Arc::new(StubBackend::new().with_text(Duration::ZERO, Ok("   ".to_string())));
        let result = orchestrator(&stub, OrchestratorConfig::new())
            .generate(&eco_bottle())
            .await
            .unwrap();

        assert_eq!(
            result.text.error().map(|e| e.kind),
            Some(ErrorKind::EmptyResponse)
        );
    }

    #[tokio::test]
    async fn test_slow_text_call_times_out_without_touching_images() {
        let stub = Arc::new(
            StubBackend::new().with_text(Duration::from_millis(500), Ok("late".to_string())),
        );
        let config = OrchestratorConfig::new().with_call_timeout(Duration::from_millis(50));
        let params = eco_bottle().with_images(AspectRatio::Square, 2);
        let result = orchestrator(&stub, config).generate(&params).await.unwrap();

        assert_eq!(result.text.error().map(|e| e.kind), Some(ErrorKind::Timeout));
        assert_eq!(result.images.len(), 2);
        assert!(result.images.iter().all(|o| o.image().is_some()));
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_keeps_request_order() {
        let stub = Arc::new(
            StubBackend::new()
                .then_image(Duration::from_millis(100), Ok(image_with(1)))
                .then_image(Duration::ZERO, Ok(image_with(2))),
        );
        let config = OrchestratorConfig::new().with_image_dispatch(ImageDispatch::Concurrent);
        let params = eco_bottle().with_images(AspectRatio::Standard, 2);
        let result = orchestrator(&stub, config).generate(&params).await.unwrap();

        assert_eq!(result.text.value(), Some("Sip happens."));
        assert_eq!(result.images[0].image(), Some(&image_with(1)));
        assert_eq!(result.images[1].image(), Some(&image_with(2)));
    }

    #[tokio::test]
    async fn test_concurrent_timeout_does_not_cancel_sibling() {
        let stub = Arc::new(
            StubBackend::new()
                .then_image(Duration::from_millis(500), Ok(image_with(1)))
                .then_image(Duration::ZERO, Ok(image_with(2))),
        );
        let config = OrchestratorConfig::new()
            .with_image_dispatch(ImageDispatch::Concurrent)
            .with_call_timeout(Duration::from_millis(50));
        let params = eco_bottle().with_images(AspectRatio::Square, 2);
        let result = orchestrator(&stub, config).generate(&params).await.unwrap();

        assert_eq!(result.images[0].error().map(|e| e.kind), Some(ErrorKind::Timeout));
        assert_eq!(result.images[1].image(), Some(&image_with(2)));
    }

    #[tokio::test]
    async fn test_each_request_gets_its_own_id() {
        let stub = Arc::new(StubBackend::new());
        let orchestrator = orchestrator(&stub, OrchestratorConfig::new());
        let first = orchestrator.generate(&eco_bottle()).await.unwrap();
        let second = orchestrator.generate(&eco_bottle()).await.unwrap();
        assert_ne!(first.request_id, second.request_id);
        assert_eq!(stub.text_calls.load(Ordering::SeqCst), 2);
    }
}
