//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ResolveError: Issues while resolving updates for one package
//! - SourceError: Issues with package metadata retrieval
//! - ManifestError: Issues reading composer.json / composer.lock
//! - ConfigError: Issues with CLI or project configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Resolution errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Package source errors
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while resolving updates for a single package
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A stability value outside dev/alpha/beta/rc/stable
    #[error("unknown stability '{value}'")]
    UnknownStability { value: String },

    /// The package (or its tracked branch) is absent from the available set
    #[error("package '{package}' not found: {reason}")]
    PackageNotFound { package: String, reason: String },
}

/// Errors related to package metadata retrieval
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// No repository knows the package
    #[error("package '{package}' not found in {source_name}")]
    PackageNotFound {
        package: String,
        source_name: String,
    },

    /// Network request failed or returned an error status
    #[error("failed to fetch package '{package}' from {source_name}: {message}")]
    Unavailable {
        package: String,
        source_name: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {source_name}")]
    RateLimitExceeded { source_name: String },

    /// Metadata could not be decoded
    #[error("invalid response from {source_name} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        source_name: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {source_name}")]
    Timeout {
        package: String,
        source_name: String,
    },

    /// No source implementation handles the repository
    #[error("unsupported repository '{url}' (type: {kind})")]
    UnsupportedRepository { kind: String, url: String },
}

/// Errors related to project manifest files
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Project or CLI stability value is not a known level
    #[error("invalid stability '{value}': expected one of dev, alpha, beta, rc, stable")]
    InvalidStability { value: String },

    /// Malformed `--stability-flag` value
    #[error("invalid stability flag '{value}': expected 'vendor/package=level'")]
    InvalidStabilityFlag { value: String },

    /// Invalid concurrency limit
    #[error("invalid concurrency '{value}': must be at least 1")]
    InvalidConcurrency { value: usize },
}

impl ResolveError {
    /// Creates a new UnknownStability error
    pub fn unknown_stability(value: impl Into<String>) -> Self {
        ResolveError::UnknownStability {
            value: value.into(),
        }
    }

    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, reason: impl Into<String>) -> Self {
        ResolveError::PackageNotFound {
            package: package.into(),
            reason: reason.into(),
        }
    }
}

impl SourceError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, source_name: impl Into<String>) -> Self {
        SourceError::PackageNotFound {
            package: package.into(),
            source_name: source_name.into(),
        }
    }

    /// Creates a new Unavailable error
    pub fn unavailable(
        package: impl Into<String>,
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SourceError::Unavailable {
            package: package.into(),
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SourceError::InvalidResponse {
            package: package.into(),
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, source_name: impl Into<String>) -> Self {
        SourceError::Timeout {
            package: package.into(),
            source_name: source_name.into(),
        }
    }

    /// Returns true if the error means "this repository does not know the package"
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::PackageNotFound { .. })
    }
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}
