//! Feature-file loading and ECDF export for website-fingerprinting
//! experiments.
//!
//! * [`data`] – walk a directory of `<class>_<id>.csv` feature files into a
//!   cached [`data::model::Dataset`] and query it through
//!   [`data::model::WebsiteData`].
//! * [`ecdf`] – empirical CDF of a one-dimensional sample, written as a
//!   tab-separated `.dat` file.

pub mod data;
pub mod ecdf;
pub mod error;
pub mod logging;

pub use data::loader::{LoadOptions, load_data};
pub use data::model::{Dataset, SiteSelection, WebsiteData};
pub use ecdf::Ecdf;
pub use error::DataError;
