use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Front matter error: {0}")]
    FrontMatter(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Every problem found while validating one post's front matter
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid front matter: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Whether any issue concerns `field` (a dotted path such as `seo.title`)
    pub fn has_issue(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {kind}")]
pub struct FieldIssue {
    pub field: String,
    pub kind: IssueKind,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IssueKind {
    #[error("required field is missing")]
    Missing,

    #[error("expected {expected}")]
    WrongType { expected: &'static str },

    #[error("must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("'{found}' is not one of: {}", .allowed.join(", "))]
    NotInEnum {
        found: String,
        allowed: Vec<&'static str>,
    },

    #[error("'{0}' is not a valid date")]
    InvalidDate(String),

    #[error("'{0}' is not a valid URL")]
    MalformedUrl(String),

    #[error("image could not be resolved: {0}")]
    Image(String),
}
