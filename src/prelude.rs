//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use app_drawer::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, LayoutConfig};
pub use crate::core::errors::{DrawerError, Result};

// Catalog
pub use crate::catalog::entry::{AppEntry, ComponentName, UserHandle};
pub use crate::catalog::file::CatalogFile;
pub use crate::catalog::ordering::{CaseInsensitiveCollator, OrderingPolicy, TitleCollator};
pub use crate::catalog::users::{StaticUserDirectory, UserDirectory};

// Sections
pub use crate::sections::fast_scroll::FastScrollIndex;
pub use crate::sections::filter::{AppFilter, SectionFilter, TitleQueryFilter};
pub use crate::sections::model::{AppSlot, DisplayItem, FastScrollSection, SectionId, SectionInfo};
pub use crate::sections::naming::{FirstLetterNamer, SectionNamer};

// Engine
pub use crate::drawer::{AppsList, DatasetObserver};
