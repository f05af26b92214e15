//! finqa-generate
//!
//! Prompt selection, grounding context and first-line answer extraction around
//! a text-to-text model.
use anyhow::Result;
use std::path::Path;

use finqa_core::config::{resolve_with_base, GenerationSettings, ModelBackend, ModelSettings};
use finqa_core::traits::Generator;

pub mod answer;
pub mod extractive;
pub mod prompt;
pub mod t5;

pub use answer::{AnswerGenerator, GeneratedAnswer};
pub use extractive::ExtractiveGenerator;
pub use prompt::PromptMode;
pub use t5::T5Generator;

pub fn load_generator(models: &ModelSettings, generation: &GenerationSettings, base: &Path) -> Result<Box<dyn Generator>> {
    match models.backend {
        ModelBackend::Fake => { tracing::info!("using extractive generator"); Ok(Box::new(ExtractiveGenerator)) }
        ModelBackend::Candle => {
            let dir = resolve_with_base(base, &models.generator_dir);
            Ok(Box::new(T5Generator::load(&dir, generation.max_input_tokens, generation.max_new_tokens)?))
        }
    }
}
