pub mod config;
pub mod error;
pub mod frontmatter;
pub mod slug;
pub mod text;
pub mod types;

pub use config::{SiteConfig, parse_site_toml};
pub use error::{Error, FieldIssue, IssueKind, Result, ValidationError};
pub use types::*;
