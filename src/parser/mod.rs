pub mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::actions::{ActionSurface, ShaderMode};
use crate::clock::Clock;
use crate::grammar::{self, Command};
use types::{AfterReply, FollowUp, ParseResult, PendingConfirmation};

/// Guidance for text that matched nothing.
pub const NOT_RECOGNIZED: &str = "Command not recognized. Try 'help' for commands.";
/// Fallback for empty input; no grammar lookup happens for it.
pub const EMPTY_INPUT: &str = "Say something and I'll see what I can do.";
/// The yes/no gate in front of a lab wipe.
pub const RESET_PROMPT: &str = "This cannot be undone. Are you sure?";

/// How long a fresh coat of paint takes to settle before the second turn.
const PAINT_SETTLE: Duration = Duration::from_millis(1200);

/// Classifies one line against the grammar and runs whatever capability it
/// maps to. Unknown text is a normal outcome; `Err` is reserved for a
/// capability call that failed on the host side.
pub struct Parser {
    actions: Arc<dyn ActionSurface>,
    clock: Arc<dyn Clock>,
}

impl Parser {
    pub fn new(actions: Arc<dyn ActionSurface>, clock: Arc<dyn Clock>) -> Self {
        Self { actions, clock }
    }

    pub fn parse(&self, text: &str) -> Result<ParseResult> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(ParseResult::unhandled(EMPTY_INPUT));
        }

        let command = grammar::classify(trimmed);
        debug!(?command, input = trimmed, "classified input");
        self.dispatch(command)
    }

    fn dispatch(&self, command: Command) -> Result<ParseResult> {
        match command {
            Command::Help => Ok(ParseResult::reply(grammar::render_help())),

            Command::Greet => Ok(ParseResult::reply(
                "Hey! Try 'paint it green', or type 'help'.",
            )),

            Command::ToggleLamp => {
                let Some(room) = self.actions.room() else {
                    return Ok(ParseResult::unhandled(NOT_RECOGNIZED));
                };
                room.toggle_lamp()?;
                let on = room.is_lamp_on()?;
                Ok(ParseResult::reply(format!(
                    "Lamp is now {}.",
                    if on { "on" } else { "off" }
                )))
            }

            Command::SetLamp { on } => {
                let Some(room) = self.actions.room() else {
                    return Ok(ParseResult::unhandled(NOT_RECOGNIZED));
                };
                let state = if on { "on" } else { "off" };
                if room.is_lamp_on()? == on {
                    // Already there; answer without touching the capability.
                    return Ok(ParseResult::reply(format!(
                        "The lamp is already {state}."
                    )));
                }
                room.set_lamp_on(on)?;
                Ok(ParseResult::reply(format!("Done. The lamp is now {state}.")))
            }

            Command::Paint(color) => {
                let Some(lab) = self.actions.lab() else {
                    return Ok(ParseResult::unhandled(NOT_RECOGNIZED));
                };
                lab.set_color(color)?;
                let clock = Arc::clone(&self.clock);
                let name = color.name();
                let follow_up = FollowUp(Box::new(move || -> types::Reply {
                    Box::pin(async move {
                        clock.sleep(PAINT_SETTLE).await;
                        Ok(format!("There we go. {name} everywhere. How's that?"))
                    })
                }));
                Ok(ParseResult::then(
                    format!("Painting it {name}..."),
                    AfterReply::FollowUp(follow_up),
                ))
            }

            Command::SetShader(mode) => {
                let Some(lab) = self.actions.lab() else {
                    return Ok(ParseResult::unhandled(NOT_RECOGNIZED));
                };
                lab.set_shader_mode(mode)?;
                Ok(ParseResult::reply(match mode {
                    ShaderMode::Waves => "Waves online.",
                    ShaderMode::Grass => "Grass mode. Touch some.",
                    ShaderMode::None => "Shader off. Back to the plain wall.",
                }))
            }

            Command::SetCanvas { visible } => {
                let Some(lab) = self.actions.lab() else {
                    return Ok(ParseResult::unhandled(NOT_RECOGNIZED));
                };
                lab.set_canvas_visible(visible)?;
                Ok(ParseResult::reply(if visible {
                    "Canvas is up. Go wild."
                } else {
                    "Canvas put away."
                }))
            }

            Command::ResetLab => {
                if self.actions.lab().is_none() {
                    return Ok(ParseResult::unhandled(NOT_RECOGNIZED));
                }
                // No side effect here. The wipe runs only inside on_confirm.
                let actions = Arc::clone(&self.actions);
                let confirmation = PendingConfirmation {
                    prompt: RESET_PROMPT.to_string(),
                    on_confirm: Box::new(move || -> types::Reply {
                        Box::pin(async move {
                            actions
                                .lab()
                                .ok_or_else(|| anyhow!("lab capability disappeared"))?
                                .reset_lab()?;
                            Ok("All clean. Fresh start!".to_string())
                        })
                    }),
                    on_deny: Box::new(|| "Phew. Nothing touched.".to_string()),
                };
                Ok(ParseResult::then(
                    "Hold on, that wipes the whole lab.",
                    AfterReply::Confirm(confirmation),
                ))
            }

            Command::Unrecognized => Ok(ParseResult::unhandled(NOT_RECOGNIZED)),
        }
    }
}
