use anyhow::Result;

use finqa_core::traits::Generator;

/// Offline stand-in: echoes the context documents of the prompt, one per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractiveGenerator;

impl Generator for ExtractiveGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let docs: Vec<&str> = prompt
            .lines()
            .filter(|l| l.starts_with("Document "))
            .filter_map(|l| l.split_once("]: ").map(|(_, text)| text))
            .collect();
        Ok(docs.join("\n"))
    }
}
