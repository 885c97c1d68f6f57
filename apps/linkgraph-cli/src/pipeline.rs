//! Stages of the build: embed → graph → links → search.
//!
//! `embed` is the only stage that talks to the embedding provider; the graph
//! stages read whatever the cache holds. The embedder is constructed before
//! any file is read, so a missing credential fails the run up front.

use anyhow::{Context, Result};
use clap::ValueEnum;
use linkgraph_core::config::Settings;
use linkgraph_core::content_reader::ContentReader;
use linkgraph_core::traits::Embedder;
use linkgraph_core::types::{Document, GraphData, LinksData, SearchIndex};
use linkgraph_embed::get_default_embedder;
use linkgraph_graph::{build_link_graph, build_similarity_graph, EmbeddingIndex};
use linkgraph_search::SearchIndexer;
use linkgraph_store::{generate_missing, EmbeddingCache, EmbeddingStore, GenerationOptions, GenerationReport};
use tracing::info;

use crate::serializer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Stage {
    /// Embed posts missing from the cache.
    Embed,
    /// Write the similarity graph.
    Graph,
    /// Write the unified links graph with backlinks.
    Links,
    /// Write the search index.
    Search,
    /// Every stage in order.
    All,
}

pub struct Pipeline {
    settings: Settings,
    show_progress: bool,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self { Self { settings, show_progress: true } }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn settings(&self) -> &Settings { &self.settings }

    pub fn run(&self, stage: Stage) -> Result<()> {
        let embedder = match stage {
            Stage::Embed | Stage::All => Some(get_default_embedder(&self.settings.embedding)?),
            _ => None,
        };
        let docs = self.read_documents();
        if let Some(embedder) = embedder.as_deref() {
            self.embed(embedder, &docs)?;
        }
        if matches!(stage, Stage::Graph | Stage::All) {
            self.graph(&docs)?;
        }
        if matches!(stage, Stage::Links | Stage::All) {
            self.links(&docs)?;
        }
        if matches!(stage, Stage::Search | Stage::All) {
            self.search(&docs)?;
        }
        Ok(())
    }

    pub fn read_documents(&self) -> Vec<Document> {
        let dir = &self.settings.content.posts_dir;
        let docs = ContentReader::from_settings(&self.settings.content).read_directory(dir);
        info!(posts = docs.len(), dir = %dir.display(), "posts read");
        docs
    }

    fn store(&self) -> EmbeddingStore { EmbeddingStore::new(&self.settings.cache.path) }

    pub fn embed(&self, embedder: &dyn Embedder, docs: &[Document]) -> Result<GenerationReport> {
        let store = self.store();
        let mut cache = store.load();
        let mut opts = GenerationOptions::from_settings(&self.settings.cache, &self.settings.embedding);
        opts.show_progress = self.show_progress;
        let report = generate_missing(&store, &mut cache, docs, embedder, &opts)
            .with_context(|| format!("failed to save embedding cache {}", store.path().display()))?;
        info!(
            cached = report.cached,
            generated = report.generated,
            failed = report.failed,
            total = cache.len(),
            "embed stage done"
        );
        Ok(report)
    }

    fn load_cache(&self) -> EmbeddingCache { self.store().load() }

    pub fn graph(&self, docs: &[Document]) -> Result<GraphData> {
        let cache = self.load_cache();
        let index: EmbeddingIndex = cache.vectors().collect();
        let data = serializer::graph_data(build_similarity_graph(docs, &index, &self.settings.graph));
        serializer::write_artifact(&self.settings.output.graph_path, &data)?;
        info!(nodes = data.nodes.len(), edges = data.edges.len(), "graph stage done");
        Ok(data)
    }

    pub fn links(&self, docs: &[Document]) -> Result<LinksData> {
        let cache = self.load_cache();
        let index: EmbeddingIndex = cache.vectors().collect();
        let data = serializer::links_data(docs, build_link_graph(docs, &index, &self.settings.graph));
        serializer::write_artifact(&self.settings.output.links_path, &data)?;
        info!(nodes = data.nodes.len(), edges = data.edges.len(), backlinks = data.backlinks.len(), "links stage done");
        Ok(data)
    }

    pub fn search(&self, docs: &[Document]) -> Result<SearchIndex> {
        let indexer = SearchIndexer::new(self.settings.search.content_chars)?;
        let data = serializer::search_index(indexer.build(docs));
        serializer::write_artifact(&self.settings.output.search_path, &data)?;
        info!(entries = data.entries.len(), "search stage done");
        Ok(data)
    }
}
