use anyhow::{Context, Result};
use blog_kit_generator::generate_site;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::site::{load_site, print_report};

/// What a build wrote
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub posts: usize,
    pub skipped: usize,
    pub generated: Vec<String>,
    pub copied_assets: usize,
}

/// Build syndication outputs for deployment
pub async fn run(path: PathBuf, output: PathBuf, allow_invalid: bool) -> Result<()> {
    println!("🔨 Building site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let summary = build_static_site(&path, &output, allow_invalid)?;

    println!();
    println!("✅ Build complete!");
    println!("   Posts: {}", summary.posts);
    if summary.skipped > 0 {
        println!("   Skipped (invalid): {}", summary.skipped);
    }
    for page in &summary.generated {
        println!("   ✓ {}", page);
    }
    println!("   Static files copied: {}", summary.copied_assets);
    println!();

    Ok(())
}

/// Load, validate and generate into `output`.
///
/// Any invalid post aborts the build unless `allow_invalid` is set, in which
/// case the valid posts are built and the rest reported.
pub fn build_static_site(path: &Path, output: &Path, allow_invalid: bool) -> Result<BuildSummary> {
    let site = load_site(path)?;

    println!("✓ Loaded: {}", site.config.site.title);
    let report = site.collection.report();
    print_report(&report);

    if !report.is_ok() {
        if !allow_invalid {
            anyhow::bail!(
                "{} invalid post(s); fix them or pass --allow-invalid to build without them",
                report.errors.len()
            );
        }
        eprintln!(
            "   ⚠ Building without {} invalid post(s)",
            report.errors.len()
        );
    }

    fs::create_dir_all(output).context("Failed to create output directory")?;

    println!("📄 Generating outputs...");
    let generated = generate_site(&site.collection.entries, &site.config)
        .context("Failed to generate site outputs")?;

    let mut summary = BuildSummary {
        posts: site.collection.entries.len(),
        skipped: site.collection.failures.len(),
        ..BuildSummary::default()
    };

    println!("📁 Copying static files...");
    let public_src = site.root.join(&site.config.build.public_dir);
    let reserved: Vec<&str> = generated.pages.iter().map(|(page, _)| page.as_str()).collect();
    summary.copied_assets = copy_dir(&public_src, output, &reserved)?;

    for (page, contents) in generated.pages {
        let dst = output.join(&page);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&dst, contents).with_context(|| format!("Failed to write {}", dst.display()))?;
        summary.generated.push(page);
    }

    Ok(summary)
}

/// Copy every file under `src` into `dst`, keeping relative paths.
/// Files at a `reserved` path (generated outputs) are skipped.
/// A missing `src` copies nothing.
fn copy_dir(src: &Path, dst: &Path, reserved: &[&str]) -> Result<usize> {
    if !src.exists() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(src)?;
        let relative_name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if reserved.contains(&relative_name.as_str()) {
            tracing::warn!(file = %entry.path().display(), "static file shadows a generated output, skipped");
            eprintln!("   ⚠ Skipped {}: generated output takes precedence", entry.path().display());
            continue;
        }

        let target = dst.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)
            .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        copied += 1;
    }

    Ok(copied)
}
