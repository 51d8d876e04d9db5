//! Portal Module
//!
//! Configuration loading and the catalog view built from it.

pub mod catalog;
pub mod settings;

pub use catalog::{build_catalog, AppCard, CatalogView, NavLink, SectionView};
pub use settings::{load_settings, PortalSettings};
