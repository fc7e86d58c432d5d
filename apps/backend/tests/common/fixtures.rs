//! Sentences and stubs shared by the integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use petit_adam_backend::services::generator::{GeneratorError, SentenceGenerator};
use petit_adam_core::{GeneratedSentence, SentenceRecord};

/// `["Le", "chien", "court", "vite."]`: subject `[0, 1]`, verb `[2]`.
pub fn dog_record() -> SentenceRecord {
    SentenceRecord::new("Le chien court vite.", "Le chien", "court")
}

/// `["Les", "lapins", "sautent."]`: subject `[0, 1]`, verb `[2]`.
pub fn rabbit_sentence() -> GeneratedSentence {
    GeneratedSentence {
        sentence: "Les lapins sautent.".to_string(),
        words: vec![
            "Les".to_string(),
            "lapins".to_string(),
            "sautent.".to_string(),
        ],
        verb_indices: vec![2],
        subject_indices: vec![0, 1],
    }
}

/// Generator that always answers with [`rabbit_sentence`].
pub struct StubGenerator;

impl StubGenerator {
    pub fn shared() -> Arc<dyn SentenceGenerator> {
        Arc::new(Self)
    }
}

#[async_trait]
impl SentenceGenerator for StubGenerator {
    async fn generate(
        &self,
        _topic: Option<&str>,
    ) -> Result<Option<GeneratedSentence>, GeneratorError> {
        Ok(Some(rabbit_sentence()))
    }
}
