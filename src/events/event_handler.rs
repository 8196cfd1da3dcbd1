/// A component that folds a stream of events into its own state.
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}
