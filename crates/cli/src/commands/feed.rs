use super::site::load_site;
use blog_kit_generator::build_feed;
use std::path::PathBuf;

/// Print the RSS document to stdout. Invalid posts are reported on stderr
/// and left out, the same as the preview endpoint.
pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    let site = load_site(&path)?;

    for failure in &site.collection.failures {
        eprintln!("⚠ skipped {}", failure);
    }

    let feed = build_feed(&site.collection.entries, &site.config);
    print!("{}", feed.to_xml());

    Ok(())
}
