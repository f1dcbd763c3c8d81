use crate::image::FsImageResolver;
use crate::{ValidationReport, normalize, reading_time, schema};
use blog_kit_core::config::SiteConfig;
use blog_kit_core::frontmatter::parse_document;
use blog_kit_core::slug::{entry_id, slugify_path};
use blog_kit_core::{Error, PostEntry, Result};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Every post of a site, loaded and validated independently
#[derive(Debug, Default)]
pub struct Collection {
    pub entries: Vec<PostEntry>,
    pub failures: Vec<EntryFailure>,
    pub warnings: Vec<String>,
}

/// A content file that could not be turned into a post
#[derive(Debug)]
pub struct EntryFailure {
    pub source: PathBuf,
    pub error: Error,
}

impl fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source.display(), self.error)
    }
}

impl Collection {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn report(&self) -> ValidationReport {
        let drafts = self.entries.iter().filter(|e| e.post.draft).count();

        ValidationReport {
            errors: self.failures.iter().map(|f| f.to_string()).collect(),
            warnings: self.warnings.clone(),
            info: vec![
                format!("{} posts loaded", self.entries.len()),
                format!("{} drafts", drafts),
            ],
        }
    }
}

/// Load the blog collection of the site rooted at `site_root`.
///
/// Only a missing or unreadable content directory is an error; problems with
/// individual files are collected in [`Collection::failures`].
pub fn load_collection(site_root: &Path, config: &SiteConfig) -> Result<Collection> {
    let content_dir = site_root.join(&config.content.dir);
    if !content_dir.is_dir() {
        return Err(Error::InvalidData(format!(
            "content directory does not exist: {}",
            content_dir.display()
        )));
    }

    let mut collection = Collection::default();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    let walker = WalkDir::new(&content_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry.file_name()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let source = err.path().map(Path::to_path_buf).unwrap_or_default();
                warn!(source = %source.display(), error = %err, "could not read content entry");
                collection.failures.push(EntryFailure {
                    source,
                    error: Error::IoError(err.into()),
                });
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_content_file(path, config) {
            continue;
        }

        match load_entry(site_root, &content_dir, path, config) {
            Ok((post_entry, warnings)) => {
                collection
                    .warnings
                    .extend(warnings.into_iter().map(|w| format!("{}: {}", path.display(), w)));

                if let Some(first) = seen.get(&post_entry.id) {
                    let error = Error::InvalidData(format!(
                        "duplicate id '{}' (already used by {})",
                        post_entry.id,
                        first.display()
                    ));
                    warn!(source = %path.display(), %error, "skipping post");
                    collection.failures.push(EntryFailure {
                        source: path.to_path_buf(),
                        error,
                    });
                    continue;
                }

                debug!(id = %post_entry.id, source = %path.display(), "loaded post");
                seen.insert(post_entry.id.clone(), path.to_path_buf());
                collection.entries.push(post_entry);
            }
            Err(error) => {
                warn!(source = %path.display(), %error, "skipping invalid post");
                collection.failures.push(EntryFailure {
                    source: path.to_path_buf(),
                    error,
                });
            }
        }
    }

    Ok(collection)
}

/// Hidden files and `_`-prefixed files are never part of the collection
fn is_ignored(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || name.starts_with('_')
}

fn is_content_file(path: &Path, config: &SiteConfig) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("md") => true,
        Some(ext) if ext.eq_ignore_ascii_case("mdx") => config.integrations.mdx,
        _ => false,
    }
}

fn load_entry(
    site_root: &Path,
    content_dir: &Path,
    path: &Path,
    config: &SiteConfig,
) -> Result<(PostEntry, Vec<String>)> {
    let source = fs::read_to_string(path)?;
    let document = parse_document(&source)?;
    let raw = &document.front_matter;

    let relative = path.strip_prefix(content_dir).unwrap_or(path);
    let id = raw
        .get("slug")
        .and_then(|v| v.as_str())
        .map(slugify_path)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| entry_id(relative));

    let warnings = schema::unknown_fields(raw)
        .into_iter()
        .map(|field| format!("unknown field '{}' ignored", field))
        .collect();

    let images = FsImageResolver::new(site_root, path.parent().unwrap_or(content_dir));
    let mut front_matter = schema::validate(raw, &images)?;

    if config.content.compute_reading_time && front_matter.reading_time.is_none() {
        front_matter.reading_time = Some(reading_time::estimate(
            &document.body,
            config.content.words_per_minute,
        ));
    }

    let post = normalize::normalize(front_matter);

    Ok((
        PostEntry {
            id,
            post,
            body: document.body,
            source: path.to_path_buf(),
        },
        warnings,
    ))
}
