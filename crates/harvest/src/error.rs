// ABOUTME: Error types for the harvest pipeline including ErrorCode enum and HarvestError struct.
// ABOUTME: Only navigation, driver, config and persistence failures are errors; missing data is not.

use std::fmt;

/// Error codes representing the categories of run failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    NavigationTimeout,
    Navigation,
    Browser,
    Config,
    Persist,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::NavigationTimeout => "navigation timeout",
            ErrorCode::Navigation => "navigation error",
            ErrorCode::Browser => "browser error",
            ErrorCode::Config => "configuration error",
            ErrorCode::Persist => "persist error",
        };
        write!(f, "{}", s)
    }
}

/// The error type for harvest runs.
#[derive(Debug, thiserror::Error)]
pub struct HarvestError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for HarvestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "harvest: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl HarvestError {
    fn with_code(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a NavigationTimeout error. Fatal for the run.
    pub fn navigation_timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::NavigationTimeout, url, op, source)
    }

    /// Create a Navigation error (the driver could not load the target).
    pub fn navigation(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Navigation, url, op, source)
    }

    /// Create a Browser error.
    pub fn browser(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Browser, url, op, source)
    }

    /// Create a Config error (empty url).
    pub fn config(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::with_code(ErrorCode::Config, String::new(), op, source)
    }

    /// Create a Persist error.
    pub fn persist(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Persist, url, op, source)
    }

    /// Returns true if this is a NavigationTimeout error.
    pub fn is_navigation_timeout(&self) -> bool {
        self.code == ErrorCode::NavigationTimeout
    }

    /// Returns true if this is a Navigation error.
    pub fn is_navigation(&self) -> bool {
        self.code == ErrorCode::Navigation
    }

    /// Returns true if this is a Browser error.
    pub fn is_browser(&self) -> bool {
        self.code == ErrorCode::Browser
    }

    /// Returns true if this is a Config error.
    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::Config
    }

    /// Returns true if this is a Persist error.
    pub fn is_persist(&self) -> bool {
        self.code == ErrorCode::Persist
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }
}
