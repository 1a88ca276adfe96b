pub mod log;

pub trait Also: Sized {
    /// Runs `f` on a borrowed `self` and hands `self` back, for logging inside chains.
    fn also<F: FnOnce(&Self)>(self, f: F) -> Self {
        f(&self);
        self
    }
}

impl<T> Also for T {}
