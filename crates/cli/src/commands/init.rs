use anyhow::{Context, Result};
use blog_kit_core::config::SITE_CONFIG_FILE;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_TITLE: &str = "My Blog";
const DEFAULT_ORIGIN: &str = "https://example.com";
const CONTENT_DIR: &str = "src/content/blog";
const PUBLIC_DIR: &str = "public";
const STYLESHEET_FILE: &str = "rss-styles.xsl";

/// Escape a string for safe inclusion in a TOML basic string
///
/// Handles the required escape sequences:
/// - Backslash (\\) -> \\\\
/// - Quote (\") -> \\\"
/// - Backspace (\b) -> \\b
/// - Form feed (\f) -> \\f
/// - Newline (\n) -> \\n
/// - Carriage return (\r) -> \\r
/// - Tab (\t) -> \\t
///
/// See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Quote a string for a YAML front-matter value
fn yaml_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Initialize a new site directory.
///
/// Creates:
/// - site.toml with the given title and origin
/// - src/content/blog/ with a first post
/// - public/rss-styles.xsl so the feed renders in a browser
///
/// # Errors
///
/// Returns an error if the directory doesn't exist, site.toml already
/// exists, or a file can't be written.
pub async fn run(path: PathBuf, title: Option<String>, origin: Option<String>) -> Result<()> {
    println!("Initializing site directory: {}", path.display());

    if !path.exists() {
        anyhow::bail!(
            "Directory '{}' does not exist. Create it first: mkdir {}",
            path.display(),
            path.display()
        );
    }

    let site_toml_path = path.join(SITE_CONFIG_FILE);
    if site_toml_path.exists() {
        anyhow::bail!(
            "site.toml already exists at {}\nHint: Delete it first or use a different directory",
            site_toml_path.display()
        );
    }

    create_directory_structure(&path)?;
    generate_site_toml(&path, title.as_deref(), origin.as_deref())?;
    let post = generate_first_post(&path)?;
    generate_stylesheet(&path)?;

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── site.toml             ← Edit this to set title and origin");
    println!("  ├── public/");
    println!("  │   └── {}", STYLESHEET_FILE);
    println!("  └── {}/", CONTENT_DIR);
    println!(
        "      └── {}",
        post.file_name().unwrap_or_default().to_string_lossy()
    );

    println!("\nNext steps:");
    println!("  1. Edit site.toml (set origin, title, description)");
    println!("  2. Write posts in {}/", CONTENT_DIR);
    println!("  3. Preview: blog-kit preview {}", path.display());

    Ok(())
}

fn create_directory_structure(base: &Path) -> Result<()> {
    fs::create_dir_all(base.join(CONTENT_DIR))?;
    fs::create_dir_all(base.join(PUBLIC_DIR))?;
    Ok(())
}

fn generate_site_toml(base: &Path, title: Option<&str>, origin: Option<&str>) -> Result<()> {
    let title = toml_escape_string(title.unwrap_or(DEFAULT_TITLE));
    let origin = toml_escape_string(origin.unwrap_or(DEFAULT_ORIGIN));

    let content = format!(
        r##"# Site configuration

[site]
origin = "{origin}"          # canonical origin, used for absolute links
title = "{title}"
description = "Notes and articles"

[content]
dir = "{content_dir}"
compute_reading_time = false   # true: estimate from the body instead of "5 min read"
words_per_minute = 200

[feed]
enabled = true
path = "rss.xml"
link_prefix = "/blog/"
language = "vi-vn"
stylesheet = "/{stylesheet}"

[integrations]
sitemap = true
search_index = true
mdx = true

[build]
public_dir = "{public_dir}"
"##,
        origin = origin,
        title = title,
        content_dir = CONTENT_DIR,
        stylesheet = STYLESHEET_FILE,
        public_dir = PUBLIC_DIR,
    );

    fs::write(base.join(SITE_CONFIG_FILE), content).context("Failed to write site.toml")?;

    Ok(())
}

fn generate_first_post(base: &Path) -> Result<PathBuf> {
    let today = Local::now().format("%Y-%m-%d").to_string();
    let path = base.join(CONTENT_DIR).join("hello-world.md");

    let content = format!(
        r##"---
title: {title}
description: {description}
pubDate: {today}
category: notes
tags: []
language: en
draft: true
---

# Hello, world

This is your first post. Posts are markdown files with a front-matter block.

Set `draft: false` to publish it in the feed.
"##,
        title = yaml_quote("Hello World"),
        description = yaml_quote("My first post"),
        today = today,
    );

    fs::write(&path, content).context("Failed to write first post")?;

    Ok(path)
}

fn generate_stylesheet(base: &Path) -> Result<()> {
    let xsl = r##"<?xml version="1.0" encoding="UTF-8"?>
<xsl:stylesheet version="1.0" xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
  <xsl:output method="html" encoding="UTF-8" indent="yes"/>
  <xsl:template match="/">
    <html>
      <head>
        <meta charset="UTF-8"/>
        <title><xsl:value-of select="/rss/channel/title"/> - RSS</title>
      </head>
      <body>
        <h1><xsl:value-of select="/rss/channel/title"/></h1>
        <p><xsl:value-of select="/rss/channel/description"/></p>
        <ul>
          <xsl:for-each select="/rss/channel/item">
            <li>
              <a href="{link}"><xsl:value-of select="title"/></a>
              <small> - <xsl:value-of select="pubDate"/></small>
            </li>
          </xsl:for-each>
        </ul>
      </body>
    </html>
  </xsl:template>
</xsl:stylesheet>
"##;

    fs::write(base.join(PUBLIC_DIR).join(STYLESHEET_FILE), xsl)
        .context("Failed to write feed stylesheet")?;

    Ok(())
}
