use crate::error::InitError;

pub mod colored_tri;
pub mod orbit_tri;
pub mod static_tri;

pub use colored_tri::ColoredTriangle;
pub use orbit_tri::OrbitTriangle;
pub use static_tri::StaticTriangle;

/// One renderable scene. `init_render` is called exactly once, with the GL
/// context current, before the first frame; `render` once per frame.
pub trait SceneRenderer {
    fn clear_color(&self) -> (f32, f32, f32, f32) {
        (0.0, 0.0, 0.0, 0.0)
    }

    fn init_render(&mut self) -> Result<(), InitError>;

    fn render(&mut self, width: u32, height: u32);
}
