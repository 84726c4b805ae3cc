use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::Value as YamlValue;
use thiserror::Error;

/// Keys every docs page must declare in its frontmatter.
pub const REQUIRED_KEYS: [&str; 2] = ["title", "description"];

/// Flat string metadata read from the head of a content document.
///
/// Scalars are stored as their textual form. Sequences and mappings are kept
/// as compact JSON so nothing authored in the block is lost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Frontmatter {
    entries: BTreeMap<String, String>,
}

impl Frontmatter {
    /// Looks up a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Page title. Empty when the document did not declare one.
    pub fn title(&self) -> &str {
        self.get("title").unwrap_or_default()
    }

    /// Page description. Empty when the document did not declare one.
    pub fn description(&self) -> &str {
        self.get("description").unwrap_or_default()
    }

    /// Inserts or replaces a key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the block was absent or empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over keys in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fails with the first of `keys` that is missing or blank.
    pub fn require(&self, keys: &[&str]) -> Result<(), FrontmatterError> {
        match keys
            .iter()
            .find(|key| self.get(key).is_none_or(|value| value.trim().is_empty()))
        {
            Some(key) => Err(FrontmatterError::MissingKey((*key).to_string())),
            None => Ok(()),
        }
    }
}

/// Frontmatter together with the offset where the document body begins.
#[derive(Debug)]
pub struct FrontmatterExtraction {
    /// Parsed metadata.
    pub frontmatter: Frontmatter,
    /// Byte offset inside the original document where Markdown content begins.
    pub body_start: usize,
}

/// Errors emitted while parsing or extracting frontmatter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrontmatterError {
    /// Opening `---` without a closing one.
    #[error("unterminated frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
    /// A required key is absent or blank.
    #[error("frontmatter is missing required key '{0}'")]
    MissingKey(String),
}

/// Splits the YAML frontmatter off the head of `input`.
///
/// Leading blank lines and a UTF-8 BOM are tolerated before the opening fence.
/// A document without a fence yields empty frontmatter and `body_start == 0`.
pub fn extract_frontmatter(input: &str) -> Result<FrontmatterExtraction, FrontmatterError> {
    let Some((block, body_start)) = locate_block(input)? else {
        return Ok(FrontmatterExtraction {
            frontmatter: Frontmatter::default(),
            body_start: 0,
        });
    };

    Ok(FrontmatterExtraction {
        frontmatter: parse_block(block)?,
        body_start,
    })
}

fn locate_block(input: &str) -> Result<Option<(&str, usize)>, FrontmatterError> {
    let start = input.strip_prefix('\u{feff}').map_or(0, |_| '\u{feff}'.len_utf8());
    let mut offset = start;
    let mut lines = input[start..].split_inclusive('\n');

    let opened = loop {
        let Some(line) = lines.next() else {
            return Ok(None);
        };
        offset += line.len();
        if line.trim().is_empty() {
            continue;
        }
        break is_fence(line);
    };
    if !opened {
        return Ok(None);
    }

    let block_start = offset;
    for line in lines {
        if is_fence(line) {
            let block = input[block_start..offset].trim_end_matches(['\r', '\n']);
            return Ok(Some((block, offset + line.len())));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']) == "---"
}

fn parse_block(block: &str) -> Result<Frontmatter, FrontmatterError> {
    let mut frontmatter = Frontmatter::default();
    if block.trim().is_empty() {
        return Ok(frontmatter);
    }

    let value: YamlValue =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;

    match value {
        YamlValue::Null => {}
        YamlValue::Mapping(mapping) => {
            for (key, value) in mapping {
                frontmatter.insert(scalar_text(&key)?, scalar_text(&value)?);
            }
        }
        _ => return Err(FrontmatterError::InvalidRootType),
    }

    Ok(frontmatter)
}

fn scalar_text(value: &YamlValue) -> Result<String, FrontmatterError> {
    Ok(match value {
        YamlValue::Null => String::new(),
        YamlValue::Bool(flag) => flag.to_string(),
        YamlValue::Number(number) => number.to_string(),
        YamlValue::String(text) => text.clone(),
        YamlValue::Tagged(tagged) => scalar_text(&tagged.value)?,
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
            serde_json::to_string(value).map_err(|err| FrontmatterError::Parse(err.to_string()))?
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &str) -> FrontmatterExtraction {
        extract_frontmatter(input).expect("frontmatter extraction should succeed")
    }

    #[test]
    fn no_fence_means_empty_frontmatter() {
        let result = extract("## Usage\nBody");
        assert_eq!(result.body_start, 0);
        assert!(result.frontmatter.is_empty());
    }

    #[test]
    fn reads_title_and_description() {
        let input = "---\ntitle: Alert\ndescription: Animated alert boxes\n---\n## Usage";
        let result = extract(input);
        assert_eq!(result.frontmatter.title(), "Alert");
        assert_eq!(result.frontmatter.description(), "Animated alert boxes");
        assert_eq!(result.body_start, input.find("## Usage").unwrap());
    }

    #[test]
    fn non_scalar_values_become_json() {
        let input = "---\ntitle: Navbar\ntags:\n  - nav\n  - sticky\norder: 3\ndraft: false\n---\n";
        let fm = extract(input).frontmatter;
        assert_eq!(fm.get("tags"), Some(r#"["nav","sticky"]"#));
        assert_eq!(fm.get("order"), Some("3"));
        assert_eq!(fm.get("draft"), Some("false"));
    }

    #[test]
    fn empty_block_and_bom_are_tolerated() {
        let input = "---\n---\nBody";
        let result = extract(input);
        assert!(result.frontmatter.is_empty());
        assert_eq!(result.body_start, input.find("Body").unwrap());

        let input = "\u{feff}\n  \n---\ntitle: Drawer\n---\nBody";
        let result = extract(input);
        assert_eq!(result.frontmatter.title(), "Drawer");
        assert_eq!(result.body_start, input.find("Body").unwrap());
    }

    #[test]
    fn crlf_fences() {
        let input = "---\r\ntitle: CLI\r\n---\r\nBody";
        let result = extract(input);
        assert_eq!(result.frontmatter.title(), "CLI");
        assert_eq!(&input[result.body_start..], "Body");
    }

    #[test]
    fn errors() {
        assert!(matches!(
            extract_frontmatter("---\ninvalid: [unterminated\n---\n"),
            Err(FrontmatterError::Parse(_))
        ));
        assert_eq!(
            extract_frontmatter("---\ntitle: test").unwrap_err(),
            FrontmatterError::Unterminated
        );
        assert_eq!(
            extract_frontmatter("---\n- a\n- b\n---\n").unwrap_err(),
            FrontmatterError::InvalidRootType
        );
    }

    #[test]
    fn require_reports_first_missing_key() {
        let fm = extract("---\ntitle: Sticky\ndescription: '  '\n---\n").frontmatter;
        assert_eq!(
            fm.require(&REQUIRED_KEYS),
            Err(FrontmatterError::MissingKey("description".into()))
        );

        let fm = extract("---\ntitle: Sticky\ndescription: Stays put\n---\n").frontmatter;
        assert_eq!(fm.require(&REQUIRED_KEYS), Ok(()));
    }
}
