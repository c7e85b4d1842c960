use crate::assets::Texture;
use crate::error::GameError;
use crate::transform::Rect;

/// Whatever the frame is drawn onto. The core never owns the graphics
/// context; it only asks for textured rectangles.
pub trait RenderSurface {
    fn draw(&mut self, texture: &Texture, rect: Rect, rotation: f32) -> Result<(), GameError>;
}
