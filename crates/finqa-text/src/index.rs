use anyhow::{anyhow, Result};
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use finqa_core::traits::LexicalIndex;
use finqa_core::types::{Chunk, ChunkId, SearchHit, SourceKind};

use crate::tantivy_utils::{build_schema, register_tokenizer};

/// In-memory BM25 index over chunk texts.
///
/// Every chunk receives a score for every query: chunks sharing no term with
/// the query score 0 and follow the matching chunks in positional order.
pub struct Bm25Index {
	index: Index,
	reader: Option<IndexReader>,
	chunk_id_field: Field,
	text_field: Field,
	len: usize,
}

impl Bm25Index {
	pub fn new() -> Result<Self> {
		let schema = build_schema();
		let index = Index::create_in_ram(schema.clone());
		register_tokenizer(&index);
		let chunk_id_field = schema.get_field("chunk_id")?;
		let text_field = schema.get_field("text")?;
		Ok(Self { index, reader: None, chunk_id_field, text_field, len: 0 })
	}

	pub fn build(chunks: &[Chunk]) -> Result<Self> {
		let mut idx = Self::new()?;
		LexicalIndex::index(&mut idx, chunks)?;
		Ok(idx)
	}

	pub fn len(&self) -> usize { self.len }

	pub fn is_empty(&self) -> bool { self.len == 0 }

	fn query_for(&self, query: &str) -> Option<BooleanQuery> {
		let clauses: Vec<(Occur, Box<dyn Query>)> = query
			.split_whitespace()
			.map(|tok| {
				let term = Term::from_field_text(self.text_field, tok);
				(Occur::Should, Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)) as Box<dyn Query>)
			})
			.collect();
		if clauses.is_empty() { None } else { Some(BooleanQuery::new(clauses)) }
	}

	fn matching(&self, query: &BooleanQuery) -> Result<Vec<(ChunkId, f32)>> {
		let reader = self.reader.as_ref().ok_or_else(|| anyhow!("lexical index has not been built"))?;
		let searcher = reader.searcher();
		let top_docs = searcher.search(query, &TopDocs::with_limit(self.len))?;
		let mut scored = Vec::with_capacity(top_docs.len());
		for (score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr)?;
			let id = doc
				.get_first(self.chunk_id_field)
				.and_then(|v| v.as_u64())
				.ok_or_else(|| anyhow!("indexed document is missing its chunk_id"))?;
			scored.push((usize::try_from(id)?, score));
		}
		Ok(scored)
	}
}

impl LexicalIndex for Bm25Index {
	fn index(&mut self, chunks: &[Chunk]) -> Result<()> {
		let mut index_writer: IndexWriter = self.index.writer_with_num_threads(1, 50_000_000)?;
		index_writer.delete_all_documents()?;
		for (position, chunk) in chunks.iter().enumerate() {
			index_writer.add_document(doc!(
				self.chunk_id_field => position as u64,
				self.text_field => chunk.text.clone(),
			))?;
		}
		index_writer.commit()?;
		let reader = self.index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		self.reader = Some(reader);
		self.len = chunks.len();
		tracing::debug!(chunks = self.len, "built lexical index");
		Ok(())
	}

	fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
		if k == 0 || self.len == 0 { return Ok(Vec::new()); }
		let mut scored = match self.query_for(query) {
			Some(q) => self.matching(&q)?,
			None => Vec::new(),
		};
		scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

		let mut matched = vec![false; self.len];
		for (id, _) in &scored {
			if let Some(slot) = matched.get_mut(*id) { *slot = true; }
		}
		let zeros = (0..self.len).filter(|id| !matched[*id]).map(|id| (id, 0.0f32));
		Ok(scored
			.into_iter()
			.chain(zeros)
			.take(k)
			.map(|(chunk_id, score)| SearchHit { chunk_id, score, source: SourceKind::Lexical })
			.collect())
	}
}
