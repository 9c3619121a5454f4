use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("http client error: {0}")]
    Http(String),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Http(e.to_string())
    }
}

/// Why a single page could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageFailure {
    /// Worth another attempt: 429, 5xx or a transport error.
    #[error("{}", describe(.status, .reason))]
    Transient { status: Option<u16>, reason: String },

    #[error("{}", describe(.status, .reason))]
    Hard { status: Option<u16>, reason: String },

    #[error("gave up after {attempts} attempts ({last})")]
    Exhausted { attempts: u32, last: Box<PageFailure> },
}

impl PageFailure {
    /// Classifies a non-200 status.
    pub fn from_status(status: u16, body: &str) -> Self {
        let reason: String = body.chars().take(200).collect();
        if status == 429 || (500..600).contains(&status) {
            PageFailure::Transient {
                status: Some(status),
                reason,
            }
        } else {
            PageFailure::Hard {
                status: Some(status),
                reason,
            }
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, PageFailure::Transient { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            PageFailure::Transient { status, .. } | PageFailure::Hard { status, .. } => *status,
            PageFailure::Exhausted { last, .. } => last.status(),
        }
    }
}

impl From<reqwest::Error> for PageFailure {
    fn from(e: reqwest::Error) -> Self {
        PageFailure::Transient {
            status: None,
            reason: e.to_string(),
        }
    }
}

fn describe(status: &Option<u16>, reason: &str) -> String {
    match *status {
        Some(code) if reason.is_empty() => format!("HTTP {}", code),
        Some(code) => format!("HTTP {}: {}", code, reason),
        None => reason.to_string(),
    }
}
