use std::path::Path;

use finqa_core::config::{GenerationSettings, ModelBackend, ModelSettings};
use finqa_core::corpus::chunk_records;
use finqa_core::types::{Candidate, RankedCandidate, Record, SourceKind};
use finqa_generate::{load_generator, AnswerGenerator, PromptMode};

fn revenue_candidates() -> Vec<RankedCandidate> {
    let records = vec![
        Record { year: 2023, finance_parameter: "Total Revenue".into(), value: 383_285_000_000.0 },
        Record { year: 2024, finance_parameter: "Total Revenue".into(), value: 391_035_000_000.0 },
    ];
    chunk_records(&records)
        .into_iter()
        .enumerate()
        .map(|(i, c)| RankedCandidate {
            candidate: Candidate { chunk_id: i, score: 10.0, source: SourceKind::Lexical, text: c.text, metadata: c.metadata },
            re_rank_score: 1.0 - i as f32 * 0.5,
        })
        .collect()
}

fn fake_generator() -> AnswerGenerator {
    let models = ModelSettings { backend: ModelBackend::Fake, ..ModelSettings::default() };
    let oracle = load_generator(&models, &GenerationSettings::default(), Path::new(".")).expect("generator");
    AnswerGenerator::new(oracle, 3)
}

#[test]
fn single_fact_answer_references_top_value() {
    let answer = fake_generator().generate("What is the total revenue for 2023?", &revenue_candidates()).unwrap();
    assert_eq!(answer.mode, PromptMode::SingleFact);
    assert!(answer.text.contains("383285000000.0"), "{}", answer.text);
    assert!(!answer.text.contains('\n'));
}

#[test]
fn multi_year_mode_follows_the_query_not_the_candidates() {
    let gen = fake_generator();
    let answer = gen.generate("Compare revenue over two years", &revenue_candidates()).unwrap();
    assert_eq!(answer.mode, PromptMode::MultiYear);
    let answer = gen.generate("Compare revenue over two years", &revenue_candidates()[1..]).unwrap();
    assert_eq!(answer.mode, PromptMode::MultiYear);
}
