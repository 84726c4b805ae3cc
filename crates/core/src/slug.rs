use std::collections::HashMap;

/// Separator between path segments in a canonical path.
pub const SEPARATOR: char = '/';

/// Joins URL segments into a canonical content path.
///
/// An empty segment list resolves to the empty path, which addresses the
/// index document of the content root.
///
/// ```
/// use zyflo_core::slug::resolve_path;
///
/// assert_eq!(resolve_path(&["components", "alert"]), "components/alert");
/// assert_eq!(resolve_path::<&str>(&[]), "");
/// ```
pub fn resolve_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            path.push(SEPARATOR);
        }
        path.push_str(segment.as_ref());
    }
    path
}

/// Splits a canonical path back into its URL segments.
pub fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split(SEPARATOR).map(str::to_string).collect()
}

/// Anchor slug used by the table of contents.
///
/// Lowercases, turns every run of whitespace into one `-`, then drops every
/// character outside `[a-z0-9-]`. Whitespace is the ECMAScript `\s` class:
/// U+FEFF counts, U+0085 does not.
///
/// ```
/// use zyflo_core::slug::anchor_slug;
///
/// assert_eq!(anchor_slug("Getting Started!"), "getting-started");
/// ```
pub fn anchor_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for ch in text.chars() {
        if is_ecma_space(ch) {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        slug.extend(
            ch.to_lowercase()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'),
        );
    }

    slug
}

fn is_ecma_space(ch: char) -> bool {
    ch == '\u{feff}' || (ch.is_whitespace() && ch != '\u{85}')
}

/// Heading id generator matching github-slugger, used for ids in rendered bodies.
///
/// Unlike [`anchor_slug`], unicode letters survive, only single spaces become
/// hyphens, and repeated slugs get a `-1`, `-2`, ... suffix.
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    /// Creates a new slugger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next unique slug for `text`.
    pub fn slug(&mut self, text: &str) -> String {
        let base = github_slug(text);
        let mut candidate = base.clone();
        while self.seen.contains_key(&candidate) {
            let count = self.seen.entry(base.clone()).or_insert(0);
            *count += 1;
            candidate = format!("{base}-{count}");
        }
        self.seen.insert(candidate.clone(), 0);
        candidate
    }

    /// Marks an id as taken, e.g. one authored explicitly on an element.
    pub fn reserve(&mut self, slug: &str) {
        self.seen.entry(slug.to_string()).or_insert(0);
    }
}

fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == ' ' {
            slug.push('-');
        } else if ch == '-' || ch == '_' || ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        }
    }
    slug
}
