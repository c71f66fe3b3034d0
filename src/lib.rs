#![forbid(unsafe_code)]

//! App Drawer: the sectioned list engine behind a grid launcher's "all apps" surface.
//!
//! Apps go into an alphabetically sorted registry. Every mutation rebuilds three
//! derived structures:
//! 1. **Sections**: runs of apps sharing a section name (usually a first letter)
//! 2. **Display items**: the flat header/app-slot sequence a grid view binds to
//! 3. **Fast-scroll index**: scrollbar fractions mapped to jump targets
//!
//! Short sections are merged so a grid row is never left mostly empty.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use app_drawer::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use app_drawer::core::config::Config;
//! use app_drawer::sections::merger::SectionMerger;
//! ```

pub mod prelude;

pub mod catalog;
pub mod core;
pub mod drawer;
pub mod logger;
pub mod sections;
