//! Catalog listings decorated with genre names.

pub mod cascade;
pub mod loader;

pub use cascade::{CascadeOutcome, run_cascade};
pub use loader::{
    CatalogContext, CatalogRequest, CatalogSnapshot, CatalogView,
    HIGHLIGHT_LIMIT, LoadReport,
};
