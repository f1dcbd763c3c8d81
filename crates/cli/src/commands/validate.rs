use super::site::{load_site, print_report};
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let site = load_site(&path)?;
    println!("✓ site.toml valid");
    println!("  Site: {} ({})", site.config.site.title, site.config.site.origin);

    let report = site.collection.report();
    print_report(&report);

    if !report.is_ok() {
        anyhow::bail!("{} invalid post(s)", report.errors.len());
    }

    println!("✓ All posts valid");

    Ok(())
}
