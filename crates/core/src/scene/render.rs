//! Draw submission

use super::ObjectId;
use stagehook_sdk::{Affine, ObjectKind, Rect};

/// One primitive handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub object: ObjectId,
    pub kind: ObjectKind,
    pub world: Affine,
    /// Local bounds of the primitive
    pub bounds: Rect,
    /// Accumulated opacity, `0..=255`
    pub alpha: u8,
}

/// Receiver of draw commands
///
/// The renderer is external to this crate; the scene only submits.
pub trait Renderer {
    fn submit(&mut self, command: DrawCommand);
}

/// Renderer that records everything it is given
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Objects drawn, in submission order
    pub fn objects(&self) -> Vec<ObjectId> {
        self.commands.iter().map(|c| c.object).collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Renderer for CommandBuffer {
    fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
