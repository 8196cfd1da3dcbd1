// Implemented by components holding channel subscriptions or GLib sources that
// form reference cycles; `destroy` breaks them explicitly.
pub trait Destroyable {
    fn destroy(&mut self);
}
