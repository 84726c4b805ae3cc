//! Subcommand implementations. Output goes to the given writer so the
//! commands can be exercised without a terminal.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use serde::Serialize;
use zyflo_site::{BuildOptions, DocPage, DocsSite, PageMetadata};

#[derive(Serialize)]
struct PageOutput<'a> {
    page: &'a DocPage,
    metadata: PageMetadata,
}

/// Writes `<out>/<canonical>.html` and `<out>/<canonical>.json` for every routed page.
pub fn build(site: &DocsSite, out: &Path, jobs: Option<usize>, w: &mut impl Write) -> Result<()> {
    let report = site.build_all(BuildOptions { max_threads: jobs });

    for built in &report.pages {
        let page = match &built.result {
            Ok(page) => page,
            Err(err) => {
                log::error!("{err}");
                continue;
            }
        };
        let html = out.join(format!("{}.html", page.canonical_path));
        if let Some(dir) = html.parent() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }

        fs::write(&html, page.document.to_html())
            .with_context(|| format!("writing {}", html.display()))?;

        let json = out.join(format!("{}.json", page.canonical_path));
        let output = PageOutput {
            page,
            metadata: site.metadata(page),
        };
        fs::write(&json, serde_json::to_string_pretty(&output)?)
            .with_context(|| format!("writing {}", json.display()))?;
        log::debug!("wrote {}", html.display());
    }

    let stats = report.stats;
    writeln!(
        w,
        "{} {}/{} pages in {}ms",
        "built".green().bold(),
        stats.succeeded,
        stats.total,
        stats.elapsed_ms
    )?;
    if stats.failed > 0 {
        bail!("{} of {} pages failed", stats.failed, stats.total);
    }
    Ok(())
}

/// Loads every routed page and lists the failures.
pub fn check(site: &DocsSite, w: &mut impl Write) -> Result<()> {
    let failures = site.verify_content();
    if failures.is_empty() {
        writeln!(w, "{} {} pages", "ok".green().bold(), site.routes().pages().len())?;
        return Ok(());
    }
    for failure in &failures {
        let kind = if failure.is_not_found() {
            "missing".yellow().bold()
        } else {
            "invalid".red().bold()
        };
        writeln!(w, "{kind} {failure}")?;
    }
    bail!("{} routed pages failed to load", failures.len())
}

/// Prints the URL segments of every routed page.
pub fn paths(site: &DocsSite, json: bool, w: &mut impl Write) -> Result<()> {
    let paths = site.static_paths();
    if json {
        writeln!(w, "{}", serde_json::to_string_pretty(&paths)?)?;
        return Ok(());
    }
    for segments in paths {
        writeln!(w, "{}", segments.join("/"))?;
    }
    Ok(())
}

/// Prints the outline of one page.
pub fn toc(site: &DocsSite, segments: &[String], json: bool, w: &mut impl Write) -> Result<()> {
    let page = site
        .page(segments)
        .with_context(|| format!("loading '{}'", segments.join("/")))?;
    if json {
        writeln!(w, "{}", serde_json::to_string_pretty(&page.headings)?)?;
        return Ok(());
    }
    for heading in &page.headings {
        let indent = "  ".repeat(usize::from(heading.level.saturating_sub(2)));
        writeln!(w, "{indent}- {} {}", heading.text, heading.anchor.dimmed())?;
    }
    Ok(())
}

/// Prints routed pages whose title matches `query`.
pub fn search(site: &DocsSite, query: &str, w: &mut impl Write) -> Result<()> {
    let matches = site.search(query);
    if matches.is_empty() {
        writeln!(w, "No results found for \"{query}\"")?;
        return Ok(());
    }
    let prefix = site.config().docs_prefix.trim_end_matches('/');
    for page in matches {
        writeln!(
            w,
            "{}  {prefix}/{}  {}",
            page.title.bold(),
            page.canonical_path,
            page.section.dimmed()
        )?;
    }
    Ok(())
}
