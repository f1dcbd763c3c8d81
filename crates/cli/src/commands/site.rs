use anyhow::{Context, Result};
use blog_kit_core::config::{SITE_CONFIG_FILE, SiteConfig, parse_site_toml};
use blog_kit_validator::{Collection, ValidationReport, load_collection};
use std::path::{Path, PathBuf};

/// A site directory with its configuration and every post loaded
pub struct LoadedSite {
    pub root: PathBuf,
    pub config: SiteConfig,
    pub collection: Collection,
}

/// Load site.toml and the blog collection of the site at `path`
pub fn load_site(path: &Path) -> Result<LoadedSite> {
    if !path.exists() {
        anyhow::bail!("Site directory does not exist: {}", path.display());
    }

    let site_toml_path = path.join(SITE_CONFIG_FILE);
    if !site_toml_path.exists() {
        anyhow::bail!(
            "site.toml not found in {}\nRun 'blog-kit init {}' first",
            path.display(),
            path.display()
        );
    }

    let config = parse_site_toml(&site_toml_path).context("Failed to parse site.toml")?;
    let collection = load_collection(path, &config).context("Failed to load content")?;

    Ok(LoadedSite {
        root: path.to_path_buf(),
        config,
        collection,
    })
}

/// Print a validation report; errors and warnings go to stderr
pub fn print_report(report: &ValidationReport) {
    for line in &report.info {
        println!("  {}", line);
    }
    for warning in &report.warnings {
        eprintln!("  ⚠ {}", warning);
    }
    for error in &report.errors {
        eprintln!("  ✗ {}", error);
    }
}
