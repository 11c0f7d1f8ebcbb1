//! Scenes and the registry that shares one surface between them.
//!
//! Scenes are owned by the embedding application and referenced by the
//! renderer through [`SceneHandle`]s. Coordination happens through the flags
//! in [`SceneState`]:
//! - application code marks a scene dirty and decides its visibility
//! - only the renderer clears the dirty flag, after a successful render

mod handle;
mod registry;
mod state;

pub use handle::{Scene, SceneHandle};
pub use registry::SceneRegistry;
pub use state::SceneState;
