use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::ContentSettings;
use crate::error::{Error, Result};
use crate::frontmatter::parse_post;
use crate::links::{extract_wiki_links, normalize_slug};
use crate::types::Document;

#[derive(Debug, Clone)]
pub struct ContentReader {
    extensions: Vec<String>,
    include_drafts: bool,
}

impl Default for ContentReader {
    fn default() -> Self {
        Self::from_settings(&ContentSettings::default())
    }
}

impl ContentReader {
    pub fn new() -> Self { Self::default() }

    pub fn from_settings(settings: &ContentSettings) -> Self {
        Self {
            extensions: settings.extensions.iter().map(|e| e.trim_start_matches('.').to_lowercase()).collect(),
            include_drafts: settings.include_drafts,
        }
    }

    pub fn include_drafts(mut self, include: bool) -> Self {
        self.include_drafts = include;
        self
    }

    /// Read every post file directly under `dir` (non-recursive), in file-name order.
    ///
    /// A missing directory yields no documents. Unreadable files are logged and
    /// skipped; duplicate slugs keep the first file.
    pub fn read_directory(&self, dir: &Path) -> Vec<Document> {
        if !dir.is_dir() {
            info!(dir = %dir.display(), "posts directory not found; no documents");
            return vec![];
        }
        let files = self.list_post_files(dir);
        let mut seen = HashSet::new();
        let mut documents = Vec::with_capacity(files.len());
        for file_path in &files {
            let doc = match self.read_file(file_path) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(error = %e, "skipping post");
                    continue;
                }
            };
            if doc.draft && !self.include_drafts {
                debug!(slug = %doc.slug, "skipping draft");
                continue;
            }
            if !seen.insert(doc.slug.clone()) {
                warn!(slug = %doc.slug, path = %file_path.display(), "duplicate slug; keeping the first post");
                continue;
            }
            documents.push(doc);
        }
        info!(files = files.len(), documents = documents.len(), dir = %dir.display(), "read posts");
        documents
    }

    pub fn read_file(&self, file_path: &Path) -> Result<Document> {
        let bytes = fs::read(file_path).map_err(|e| Error::SourceRead {
            path: file_path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let source = String::from_utf8_lossy(&bytes);
        let stem = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| Error::SourceRead {
                path: file_path.to_path_buf(),
                reason: "file has no name".to_string(),
            })?;
        Ok(Self::parse_document(&stem, &source))
    }

    /// Build a document from raw source; `file_stem` supplies the default slug and title.
    pub fn parse_document(file_stem: &str, source: &str) -> Document {
        let (meta, body) = parse_post(source);
        let slug = meta
            .slug
            .as_deref()
            .map(normalize_slug)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| normalize_slug(file_stem));
        Document {
            title: meta.title.unwrap_or_else(|| slug.clone()),
            tags: meta.tags.unwrap_or_default(),
            date: meta.date.unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
            excerpt: meta.excerpt,
            draft: meta.draft,
            explicit_links: extract_wiki_links(body),
            body: body.to_string(),
            slug,
        }
    }

    fn list_post_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut post_files = Vec::new();
        for entry in walkdir::WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            let ext = path.extension().and_then(|s| s.to_str()).map(str::to_lowercase);
            if ext.is_some_and(|ext| self.extensions.contains(&ext)) {
                post_files.push(path.to_path_buf());
            }
        }
        post_files.sort();
        post_files
    }
}
