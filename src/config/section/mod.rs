//! Configuration section definitions.
//!
//! | Module  | TOML Section | Purpose                         |
//! |---------|--------------|---------------------------------|
//! | `build` | `[build]`    | Paths, minify, CSS strategy     |
//! | `site`  | `[site]`     | Site metadata                   |

pub mod build;
pub mod site;

pub use build::{BuildSectionConfig, CssConfig, CssStrategy};
pub use site::{AuthorInfo, SiteMetadata, SiteSectionConfig};
