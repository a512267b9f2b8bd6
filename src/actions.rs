use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::grammar::color::ColorToken;

/// Backdrop shader programs the lab can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderMode {
    None,
    Waves,
    Grass,
}

impl Default for ShaderMode {
    fn default() -> Self {
        Self::None
    }
}

/// Office capabilities: the desk lamp.
pub trait RoomActions: Send + Sync {
    fn toggle_lamp(&self) -> Result<()>;
    fn set_lamp_on(&self, on: bool) -> Result<()>;
    fn is_lamp_on(&self) -> Result<bool>;
}

/// Lab capabilities: shader backdrop, brush color, drawing canvas, reset.
pub trait LabActions: Send + Sync {
    fn set_color(&self, color: ColorToken) -> Result<()>;
    fn set_shader_mode(&self, mode: ShaderMode) -> Result<()>;
    fn set_canvas_visible(&self, visible: bool) -> Result<()>;
    fn reset_lab(&self) -> Result<()>;
}

/// Capability surface handed in by the host scene. A deployment exposes
/// whichever sub-surfaces its room actually has; commands whose surface is
/// absent fall back to "not understood" instead of failing.
///
/// The interpreter only ever borrows this. Lifecycle stays with the host.
pub trait ActionSurface: Send + Sync {
    fn room(&self) -> Option<&dyn RoomActions> {
        None
    }

    fn lab(&self) -> Option<&dyn LabActions> {
        None
    }
}
