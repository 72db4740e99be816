//! `[site]` section configuration.
//!
//! Holds the site metadata. It is read once at startup and handed out by
//! reference; nothing in the build mutates it.
//!
//! # Example
//!
//! ```toml
//! [site.info]
//! title = "My Blog"
//! url = "https://myblog.com"
//! language = "en-gb"
//! description = "A personal blog"
//!
//! [site.info.author]
//! name = "Alice"
//! email = "alice@myblog.com"
//! url = "https://myblog.com/about"
//!
//! [site.info.extra]
//! github = "https://github.com/alice"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site metadata (title, author, description, etc.)
    pub info: SiteMetadata,
}

/// Site metadata consumed by templates and feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMetadata {
    pub title: String,

    /// Base URL of the deployed site (e.g., "https://example.com").
    pub url: String,

    /// Language code (e.g., "en", "en-gb").
    pub language: String,

    pub description: String,

    pub author: AuthorInfo,

    /// Free-form fields passed through to templates untouched.
    pub extra: FxHashMap<String, toml::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorInfo {
    pub name: String,
    pub email: String,
    pub url: String,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            url: String::new(),
            language: "en".into(),
            description: String::new(),
            author: AuthorInfo::default(),
            extra: FxHashMap::default(),
        }
    }
}

pub struct SiteMetadataFields {
    pub title: FieldPath,
    pub url: FieldPath,
    pub language: FieldPath,
    pub description: FieldPath,
}

pub struct AuthorInfoFields {
    pub name: FieldPath,
    pub email: FieldPath,
    pub url: FieldPath,
}

impl SiteMetadata {
    pub const FIELDS: SiteMetadataFields = SiteMetadataFields {
        title: FieldPath::new("site.info.title"),
        url: FieldPath::new("site.info.url"),
        language: FieldPath::new("site.info.language"),
        description: FieldPath::new("site.info.description"),
    };

    /// Validate site metadata.
    ///
    /// # Checks
    /// - `title` and `language` must not be empty
    /// - `url` and `author.url`, when set, must be http(s) URLs with a host
    /// - `description` and `author.name` only warn when empty
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.title.trim().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.title,
                "site title is empty",
                format!("set {}, e.g.: \"My Blog\"", Self::FIELDS.title),
            );
        }

        if self.language.trim().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.language,
                "language is empty",
                "use a language tag like \"en\" or \"en-gb\"",
            );
        }

        if self.description.trim().is_empty() {
            diag.warn(Self::FIELDS.description, "description is empty");
        }

        if !self.url.is_empty() {
            validate_url(&self.url, Self::FIELDS.url, diag);
        }

        self.author.validate(diag);
    }
}

impl AuthorInfo {
    pub const FIELDS: AuthorInfoFields = AuthorInfoFields {
        name: FieldPath::new("site.info.author.name"),
        email: FieldPath::new("site.info.author.email"),
        url: FieldPath::new("site.info.author.url"),
    };

    fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.name.trim().is_empty() {
            diag.warn(Self::FIELDS.name, "author name is empty");
        }

        if !self.email.is_empty() && !self.email.contains('@') {
            diag.error(
                Self::FIELDS.email,
                format!("'{}' is not an email address", self.email),
            );
        }

        if !self.url.is_empty() {
            validate_url(&self.url, Self::FIELDS.url, diag);
        }
    }
}

/// URL must parse, use http(s), and have a host.
fn validate_url(url_str: &str, field: FieldPath, diag: &mut ConfigDiagnostics) {
    match url::Url::parse(url_str) {
        Ok(parsed) => {
            if !matches!(parsed.scheme(), "http" | "https") {
                diag.error_with_hint(
                    field,
                    format!(
                        "scheme '{}' not supported, must be http or https",
                        parsed.scheme()
                    ),
                    "use format like https://example.com",
                );
            }
            if parsed.host_str().is_none() {
                diag.error_with_hint(
                    field,
                    "URL must have a valid host",
                    "use format like https://example.com",
                );
            }
        }
        Err(e) => {
            diag.error_with_hint(
                field,
                format!("invalid URL: {}", e),
                "use format like https://example.com",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn diagnose(info: &SiteMetadata) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        info.validate(&mut diag);
        diag
    }

    #[test]
    fn test_parse_full_metadata() {
        let config = test_parse_config(
            r#"
url = "https://example.test"
language = "en-gb"

[site.info.author]
name = "Example Author"
email = "author@example.test"
url = "https://example.test/about"

[site.info.extra]
mastodon = "@example"
"#,
        );
        let info = &config.site.info;
        assert_eq!(info.title, "Example");
        assert_eq!(info.url, "https://example.test");
        assert_eq!(info.language, "en-gb");
        assert_eq!(info.author.name, "Example Author");
        assert_eq!(info.author.email, "author@example.test");
        assert_eq!(
            info.extra.get("mastodon").and_then(|v| v.as_str()),
            Some("@example")
        );
    }

    #[test]
    fn test_defaults() {
        let info = SiteMetadata::default();
        assert_eq!(info.language, "en");
        assert!(info.url.is_empty());
        assert!(info.extra.is_empty());
    }

    #[test]
    fn test_repeated_reads_are_stable() {
        let config = test_parse_config("url = \"https://example.test\"");
        let first = config.site.info.clone();
        let info = &config.site.info;
        assert_eq!(info.title, "Example");
        assert_eq!(info.url, "https://example.test");
        assert_eq!(*info, first);
        assert_eq!(config.site.info, first);
    }

    #[test]
    fn test_validate_empty_title() {
        let diag = diagnose(&SiteMetadata::default());
        assert!(diag.has_errors());
        assert!(
            diag.errors()
                .iter()
                .any(|e| e.field == SiteMetadata::FIELDS.title)
        );
    }

    #[test]
    fn test_validate_bad_url_scheme() {
        let info = SiteMetadata {
            title: "Example".into(),
            url: "ftp://example.test".into(),
            ..SiteMetadata::default()
        };
        let diag = diagnose(&info);
        assert!(
            diag.errors()
                .iter()
                .any(|e| e.field == SiteMetadata::FIELDS.url && e.message.contains("ftp"))
        );
    }

    #[test]
    fn test_validate_unparsable_url() {
        let info = SiteMetadata {
            title: "Example".into(),
            url: "not a url".into(),
            ..SiteMetadata::default()
        };
        let diag = diagnose(&info);
        assert!(diag.errors().iter().any(|e| e.message.contains("invalid URL")));
    }

    #[test]
    fn test_validate_author_email() {
        let info = SiteMetadata {
            title: "Example".into(),
            author: AuthorInfo {
                name: "A".into(),
                email: "not-an-email".into(),
                url: String::new(),
            },
            ..SiteMetadata::default()
        };
        let diag = diagnose(&info);
        assert!(
            diag.errors()
                .iter()
                .any(|e| e.field == AuthorInfo::FIELDS.email)
        );
    }

    #[test]
    fn test_validate_empty_description_only_warns() {
        let info = SiteMetadata {
            title: "Example".into(),
            author: AuthorInfo {
                name: "A".into(),
                ..AuthorInfo::default()
            },
            ..SiteMetadata::default()
        };
        let diag = diagnose(&info);
        assert!(!diag.has_errors());
        assert!(
            diag.warnings()
                .iter()
                .any(|w| w.field == SiteMetadata::FIELDS.description)
        );
    }
}
