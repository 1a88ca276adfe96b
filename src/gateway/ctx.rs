use std::{any::Any, fmt::Debug, sync::Arc};

/// Application-wide data shared by every exchange and the lifespan handlers.
///
/// The value is opaque to the core and never locked by it; anything a handler mutates must
/// bring its own synchronization.
#[derive(Clone)]
pub struct State(Arc<dyn Any + Send + Sync>);

impl State {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self(value)
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(())
    }
}

impl Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn typed_access() {
        let state = State::new(Mutex::new(vec![1]));
        let shared = state.clone();
        shared.get::<Mutex<Vec<i32>>>().unwrap().lock().unwrap().push(2);
        assert_eq!(*state.get::<Mutex<Vec<i32>>>().unwrap().lock().unwrap(), vec![1, 2]);
        assert!(state.get::<String>().is_none());
    }
}
