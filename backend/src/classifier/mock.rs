use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::ClassificationResult;
use std::sync::Mutex;
use std::time::Duration;

use super::catalog::Catalog;
use super::{Classifier, ClassifierError};
use crate::upload::UploadedImage;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

/// Chooses which catalog entry to return. `len` is never zero.
pub trait Selector: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Uniform choice from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl Selector for RandomSelector {
    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Uniform choice from a seeded RNG, reproducible across runs.
#[derive(Debug)]
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Selector for SeededSelector {
    fn pick(&self, len: usize) -> usize {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(0..len)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl Selector for FixedSelector {
    fn pick(&self, len: usize) -> usize {
        self.0 % len
    }
}

/// Stand-in for a real model: sleeps, then returns a canned catalog entry.
pub struct MockClassifier {
    catalog: Catalog,
    delay: Duration,
    selector: Box<dyn Selector>,
}

impl MockClassifier {
    pub fn new(catalog: Catalog, delay: Duration, selector: Box<dyn Selector>) -> Self {
        Self {
            catalog,
            delay,
            selector,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, image: &UploadedImage) -> Result<ClassificationResult, ClassifierError> {
        log::debug!(
            "Mock classifying {} bytes ({}), delay {:?}",
            image.size(),
            image.content_type,
            self.delay
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let index = self.selector.pick(self.catalog.entries().len());
        let entry = self.catalog.get(index).ok_or_else(|| {
            ClassifierError::InvalidResponse(format!("selector returned index {} out of range", index))
        })?;

        Ok(entry.to_result(Utc::now()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::catalog::CatalogEntry;
    use shared::Severity;
    use std::collections::HashSet;
    use std::time::Instant;

    fn sample_image() -> UploadedImage {
        UploadedImage::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg", Some("lesion.jpg".into()))
    }

    fn instant_classifier(selector: Box<dyn Selector>) -> MockClassifier {
        MockClassifier::new(Catalog::builtin(), Duration::ZERO, selector)
    }

    #[tokio::test]
    async fn fixed_selector_returns_that_entry() {
        let classifier = instant_classifier(Box::new(FixedSelector(0)));
        let before = Utc::now();
        let result = classifier.classify(&sample_image()).await.unwrap();

        assert_eq!(result.condition, "Melanoma");
        assert_eq!(result.severity, Severity::High);
        assert!(result.timestamp >= before);
    }

    #[tokio::test]
    async fn fixed_selector_wraps_around() {
        let classifier = instant_classifier(Box::new(FixedSelector(5)));
        let result = classifier.classify(&sample_image()).await.unwrap();
        assert_eq!(result.condition, "Benign Nevus");
    }

    #[tokio::test]
    async fn seeded_selectors_agree() {
        let a = instant_classifier(Box::new(SeededSelector::new(42)));
        let b = instant_classifier(Box::new(SeededSelector::new(42)));
        let image = sample_image();

        for _ in 0..16 {
            let left = a.classify(&image).await.unwrap();
            let right = b.classify(&image).await.unwrap();
            assert_eq!(left.condition, right.condition);
        }
    }

    #[test]
    fn random_selector_stays_in_range_and_covers_catalog() {
        let seen: HashSet<usize> = (0..1000).map(|_| RandomSelector.pick(4)).collect();
        assert!(seen.iter().all(|&i| i < 4));
        assert_eq!(seen.len(), 4);
    }

    #[tokio::test]
    async fn results_always_come_from_the_catalog() {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("Only", 0.25, Severity::Medium, "single entry"),
        ])
        .unwrap();
        let classifier = MockClassifier::new(catalog, Duration::ZERO, Box::new(RandomSelector));

        let result = classifier.classify(&sample_image()).await.unwrap();
        assert_eq!(result.condition, "Only");
        assert_eq!(result.confidence, 0.25);
    }

    #[tokio::test]
    async fn waits_for_the_configured_delay() {
        let delay = Duration::from_millis(50);
        let classifier = MockClassifier::new(Catalog::builtin(), delay, Box::new(FixedSelector(1)));

        let started = Instant::now();
        classifier.classify(&sample_image()).await.unwrap();
        assert!(started.elapsed() >= delay);
    }
}
