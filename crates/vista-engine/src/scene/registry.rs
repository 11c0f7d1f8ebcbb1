use std::cell::RefCell;
use std::rc::Rc;

use super::handle::scene_addr;
use super::SceneHandle;

/// Insertion-ordered set of scene handles.
///
/// Invariant: a scene appears at most once. Registering a scene that is
/// already present is a no-op and keeps its original position.
pub struct SceneRegistry<S: ?Sized> {
    scenes: Vec<SceneHandle<S>>,
}

impl<S: ?Sized> SceneRegistry<S> {
    #[inline]
    pub fn new() -> Self {
        Self { scenes: Vec::new() }
    }

    /// Adds `scene` if absent. Returns `true` when it was added.
    pub fn insert(&mut self, scene: SceneHandle<S>) -> bool {
        if self.contains(&scene) {
            return false;
        }
        self.scenes.push(scene);
        true
    }

    /// Removes `scene` if present. Returns `true` when it was removed.
    pub fn remove<T: ?Sized>(&mut self, scene: &Rc<RefCell<T>>) -> bool {
        let addr = scene_addr(scene);
        match self.scenes.iter().position(|s| scene_addr(s) == addr) {
            Some(index) => {
                self.scenes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains<T: ?Sized>(&self, scene: &Rc<RefCell<T>>) -> bool {
        let addr = scene_addr(scene);
        self.scenes.iter().any(|s| scene_addr(s) == addr)
    }

    /// Handles in registration order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, SceneHandle<S>> {
        self.scenes.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl<S: ?Sized> Default for SceneRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
