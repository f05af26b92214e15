use tantivy::schema::{IndexRecordOption, Schema, TextFieldIndexing, TextOptions, INDEXED, STORED};
use tantivy::tokenizer::{TextAnalyzer, WhitespaceTokenizer};
use tantivy::Index;

/// Name of the analyzer registered by [`register_tokenizer`].
pub const WHITESPACE_ANALYZER: &str = "finqa_whitespace";

pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	let _chunk_id_field = schema_builder.add_u64_field("chunk_id", INDEXED | STORED);
	let text_field_indexing = TextFieldIndexing::default().set_tokenizer(WHITESPACE_ANALYZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	let text_options = TextOptions::default().set_indexing_options(text_field_indexing).set_stored();
	let _text_field = schema_builder.add_text_field("text", text_options);
	schema_builder.build()
}

/// Whitespace split with no lowercasing, stemming or stop words, so
/// `Revenue` and `revenue` are different terms.
pub fn register_tokenizer(index: &Index) {
	let tokenizer = TextAnalyzer::builder(WhitespaceTokenizer::default()).build();
	index.tokenizers().register(WHITESPACE_ANALYZER, tokenizer);
}
