//! Derived list state: section building, merging, fast-scroll index.

pub mod builder;
pub mod fast_scroll;
pub mod filter;
pub mod merger;
pub mod model;
pub mod naming;
