//! The apps list engine: registry mutations in, sectioned display list out.

pub mod apps_list;
pub mod observer;

pub use apps_list::AppsList;
pub use observer::DatasetObserver;
