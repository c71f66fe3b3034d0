//! Change notification towards the view layer.

/// Told that the derived list changed and must be re-read.
///
/// Called once per mutating call on [`AppsList`](crate::drawer::AppsList), after
/// every derived structure has been rebuilt.
pub trait DatasetObserver {
    fn on_dataset_changed(&mut self);
}

impl<F> DatasetObserver for F
where
    F: FnMut(),
{
    fn on_dataset_changed(&mut self) {
        self();
    }
}
