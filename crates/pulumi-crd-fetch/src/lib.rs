//! Pulumi CRD Fetch - Input schema acquisition
//!
//! An `--in` value is either an `http`/`https` URL or a local path:
//!
//! - **URLs** are fetched with a 15 second deadline; errors mention only the
//!   sanitized URL (no credentials, query or fragment)
//! - **Relative paths** are tried against `PWD` first, then as given
//!
//! ```rust,no_run
//! use pulumi_crd_fetch::SchemaLoader;
//!
//! # async fn example() -> Result<(), pulumi_crd_fetch::FetchError> {
//! let doc = SchemaLoader::from_env().load("schema.json").await?;
//! println!("{} resources", doc.resources.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;
pub mod source;

pub use error::{FetchError, Result};
pub use loader::{DEFAULT_TIMEOUT, SchemaLoader};
pub use source::{SchemaSource, sanitize_url};
