//! The docs site: pages, metadata, static paths, search, and the static build.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use zyflo_core::{HeadingRecord, ParseOptions, resolve_path, split_path};
use zyflo_render::{CompileOptions, CompiledDocument, DocumentCompiler};

use crate::config::SiteConfig;
use crate::content::{ContentStore, LoadError};
use crate::memo::PageMemo;
use crate::pagination::adjacent;
use crate::routes::{FlatPageEntry, RouteTable};

/// Open Graph card size.
pub const OG_IMAGE_WIDTH: u32 = 1200;
/// Open Graph card size.
pub const OG_IMAGE_HEIGHT: u32 = 630;

/// One level of the breadcrumb trail above a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    /// Display label.
    pub label: String,
    /// Site-relative link.
    pub href: String,
}

/// Everything needed to render one docs page.
#[derive(Debug, Clone, Serialize)]
pub struct DocPage {
    /// Canonical path of the page.
    pub canonical_path: String,
    /// URL segments the page was requested with.
    pub segments: Vec<String>,
    /// Frontmatter and body.
    pub document: CompiledDocument,
    /// Page outline.
    pub headings: Vec<HeadingRecord>,
    /// Trail from the docs root to the page.
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Previous page in navigation order.
    pub previous: Option<FlatPageEntry>,
    /// Next page in navigation order.
    pub next: Option<FlatPageEntry>,
}

/// Open Graph image entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OgImage {
    /// Absolute image URL.
    pub url: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Open Graph block of [`PageMetadata`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenGraph {
    /// Card title.
    pub title: String,
    /// Card description.
    pub description: String,
    /// Absolute page URL.
    pub url: String,
    /// Card images.
    pub images: Vec<OgImage>,
}

/// `<head>` metadata of a docs page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Document title.
    pub title: String,
    /// Meta description.
    pub description: String,
    /// Social card.
    pub open_graph: OpenGraph,
}

/// Memo of rendered pages for one request.
pub type PageCache = PageMemo<Result<DocPage, LoadError>>;

/// Thread pool settings for [`DocsSite::build_all`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Worker threads. Defaults to one per core.
    pub max_threads: Option<usize>,
}

/// Counters for a static build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Routed pages.
    pub total: usize,
    /// Pages that rendered.
    pub succeeded: usize,
    /// Pages that failed to load.
    pub failed: usize,
    /// Wall time in milliseconds.
    pub elapsed_ms: u64,
}

/// Result of building one routed page.
#[derive(Debug)]
pub struct BuiltPage {
    /// Route entry the page was built for.
    pub entry: FlatPageEntry,
    /// The rendered page or why it failed.
    pub result: Result<DocPage, LoadError>,
}

/// Pages in navigation order with build counters.
#[derive(Debug)]
pub struct BuildReport {
    /// One entry per routed page, in navigation order.
    pub pages: Vec<BuiltPage>,
    /// Counters.
    pub stats: BuildStats,
}

impl BuildReport {
    /// Failed pages only.
    pub fn failures(&self) -> impl Iterator<Item = &LoadError> {
        self.pages.iter().filter_map(|page| page.result.as_ref().err())
    }
}

/// The docs site over a configuration and its content store.
#[derive(Debug, Clone)]
pub struct DocsSite {
    config: Arc<SiteConfig>,
    store: Arc<ContentStore>,
}

impl DocsSite {
    /// Builds the site described by `config`.
    pub fn new(config: SiteConfig) -> Self {
        let parse = if config.extension == ".md" {
            ParseOptions::markdown()
        } else {
            ParseOptions::mdx()
        };
        let compiler = DocumentCompiler::with_options(CompileOptions {
            parse,
            allow_raw_html: config.allow_raw_html,
            ..CompileOptions::default()
        });
        let store = ContentStore::with_compiler(
            config.content_root.clone(),
            config.extension.clone(),
            compiler,
        );
        Self::with_store(config, store)
    }

    /// Site with an explicit content store.
    pub fn with_store(config: SiteConfig, store: ContentStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Navigation.
    pub fn routes(&self) -> &RouteTable {
        &self.config.routes
    }

    /// Content store.
    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Renders the page addressed by URL segments. The source is read once
    /// and feeds both the compiler and the outline.
    pub fn page<S: AsRef<str>>(&self, segments: &[S]) -> Result<DocPage, LoadError> {
        let canonical_path = resolve_path(segments);
        let raw = self.store.read_raw(&canonical_path)?;
        let parse = self.store.compiler().options().parse;
        let headings = self.config.toc_mode.extract(&raw, parse);
        let document = self.store.compile(&canonical_path, &raw)?;
        let neighbours = adjacent(&canonical_path, self.routes().pages());

        Ok(DocPage {
            segments: segments.iter().map(|s| s.as_ref().to_string()).collect(),
            breadcrumbs: self.breadcrumbs(&canonical_path),
            previous: neighbours.previous.cloned(),
            next: neighbours.next.cloned(),
            canonical_path,
            document,
            headings,
        })
    }

    /// [`DocsSite::page`] through a per-request memo.
    pub fn page_cached<'m, S: AsRef<str>>(
        &self,
        cache: &'m mut PageCache,
        segments: &[S],
    ) -> &'m Result<DocPage, LoadError> {
        let canonical_path = resolve_path(segments);
        cache.get_or_insert_with(&canonical_path, || self.page(segments))
    }

    /// Metadata for a rendered page.
    pub fn metadata(&self, page: &DocPage) -> PageMetadata {
        let title = page.document.title().to_string();
        let description = page.document.description().to_string();
        PageMetadata {
            open_graph: OpenGraph {
                title: title.clone(),
                description: description.clone(),
                url: self.config.page_url(&page.canonical_path),
                images: vec![OgImage {
                    url: self.config.og_image_url(),
                    width: OG_IMAGE_WIDTH,
                    height: OG_IMAGE_HEIGHT,
                }],
            },
            title,
            description,
        }
    }

    /// Metadata for the page at `segments`, or `None` when it cannot be loaded.
    pub fn metadata_for<S: AsRef<str>>(
        &self,
        cache: &mut PageCache,
        segments: &[S],
    ) -> Option<PageMetadata> {
        let page = self.page_cached(cache, segments).as_ref().ok()?;
        Some(self.metadata(page))
    }

    /// URL segments of every routed page, for static generation.
    pub fn static_paths(&self) -> Vec<Vec<String>> {
        self.routes()
            .pages()
            .iter()
            .map(|page| split_path(&page.canonical_path))
            .collect()
    }

    /// Routed pages whose title contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&FlatPageEntry> {
        let query = query.to_lowercase();
        self.routes()
            .pages()
            .iter()
            .filter(|page| page.title.to_lowercase().contains(&query))
            .collect()
    }

    /// Loads every routed document and returns the ones that fail.
    pub fn verify_content(&self) -> Vec<LoadError> {
        let failures: Vec<LoadError> = self
            .routes()
            .pages()
            .par_iter()
            .filter_map(|page| self.store.load(&page.canonical_path).err())
            .collect();
        if failures.is_empty() {
            log::info!("all {} routed pages load", self.routes().pages().len());
        }
        failures
    }

    /// Renders every routed page in parallel. Pages are independent and come
    /// back in navigation order.
    pub fn build_all(&self, options: BuildOptions) -> BuildReport {
        let start = Instant::now();
        let entries = self.routes().pages();
        let succeeded = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        let build_one = |entry: &FlatPageEntry| {
            let result = self.page(&split_path(&entry.canonical_path));
            match &result {
                Ok(_) => succeeded.fetch_add(1, Ordering::Relaxed),
                Err(_) => failed.fetch_add(1, Ordering::Relaxed),
            };
            BuiltPage {
                entry: entry.clone(),
                result,
            }
        };

        let pool = options.max_threads.and_then(|threads| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|err| log::warn!("falling back to the global thread pool: {err}"))
                .ok()
        });
        let pages: Vec<BuiltPage> = match pool {
            Some(pool) => pool.install(|| entries.par_iter().map(build_one).collect()),
            None => entries.par_iter().map(build_one).collect(),
        };

        let stats = BuildStats {
            total: entries.len(),
            succeeded: succeeded.into_inner(),
            failed: failed.into_inner(),
            elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        log::info!(
            "built {}/{} pages in {}ms",
            stats.succeeded,
            stats.total,
            stats.elapsed_ms
        );
        BuildReport { pages, stats }
    }

    fn breadcrumbs(&self, canonical_path: &str) -> Vec<Breadcrumb> {
        let prefix = self.config.docs_prefix.trim_end_matches('/');
        let segments = split_path(canonical_path);
        let mut crumbs = Vec::with_capacity(segments.len());
        for depth in 1..=segments.len() {
            let path = resolve_path(&segments[..depth]);
            let label = match depth {
                1 => self.routes().section(&path).map(|s| s.title.clone()),
                _ => self.routes().page(&path).map(|p| p.title.clone()),
            }
            .unwrap_or_else(|| title_case(&segments[depth - 1]));
            crumbs.push(Breadcrumb {
                label,
                href: format!("{prefix}/{path}"),
            });
        }
        crumbs
    }
}

/// `command-line-interface` to `Command Line Interface`.
fn title_case(segment: &str) -> String {
    segment
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
