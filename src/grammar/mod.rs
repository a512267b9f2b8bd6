pub mod color;

use serde::Serialize;

use crate::actions::ShaderMode;
use color::ColorToken;

/// Closed vocabulary of intents the interpreter supports. Immutable once
/// classified; everything outside it is `Unrecognized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Greet,
    ToggleLamp,
    SetLamp { on: bool },
    Paint(ColorToken),
    SetShader(ShaderMode),
    SetCanvas { visible: bool },
    ResetLab,
    Help,
    Unrecognized,
}

/// One line of the help surface, rendered verbatim by the session and by any
/// external help terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HelpEntry {
    pub command: &'static str,
    pub description: &'static str,
}

struct GrammarEntry {
    command: &'static str,
    description: &'static str,
    matches: fn(&str) -> Option<Command>,
}

/// The single source of truth for the vocabulary: each entry carries its
/// matcher and its help line, so the help surface cannot drift from what
/// actually matches. Order is priority order; first match wins, so specific
/// entries sit above the general fallbacks.
const GRAMMAR: &[GrammarEntry] = &[
    GrammarEntry {
        command: "help",
        description: "list every command I understand",
        matches: match_help,
    },
    GrammarEntry {
        command: "hello",
        description: "say hi",
        matches: match_greet,
    },
    GrammarEntry {
        command: "turn on the lamp",
        description: "switch the desk lamp on",
        matches: match_lamp_on,
    },
    GrammarEntry {
        command: "turn off the lamp",
        description: "switch the desk lamp off",
        matches: match_lamp_off,
    },
    GrammarEntry {
        command: "toggle the lamp",
        description: "flip the desk lamp",
        matches: match_lamp_toggle,
    },
    GrammarEntry {
        command: "paint it <color>",
        description: "recolor the backdrop (green, blue, red, purple, ...)",
        matches: match_paint,
    },
    GrammarEntry {
        command: "shader off",
        description: "stop the backdrop shader",
        matches: match_shader_off,
    },
    GrammarEntry {
        command: "show the waves",
        description: "run the wave shader",
        matches: match_shader_waves,
    },
    GrammarEntry {
        command: "grass mode",
        description: "run the grass shader",
        matches: match_shader_grass,
    },
    GrammarEntry {
        command: "close the canvas",
        description: "put the drawing canvas away",
        matches: match_canvas_hide,
    },
    GrammarEntry {
        command: "open the canvas",
        description: "bring up the drawing canvas",
        matches: match_canvas_show,
    },
    GrammarEntry {
        command: "reset everything",
        description: "wipe the lab back to defaults (asks first)",
        matches: match_reset,
    },
];

/// Classify one raw line. Case-insensitive, whitespace-trimmed, keyword
/// based. Never panics; unknown text is a normal outcome.
pub fn classify(text: &str) -> Command {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return Command::Unrecognized;
    }
    for entry in GRAMMAR {
        if let Some(cmd) = (entry.matches)(&needle) {
            return cmd;
        }
    }
    Command::Unrecognized
}

/// The help surface, in declared (priority) order.
pub fn help_entries() -> impl Iterator<Item = HelpEntry> {
    GRAMMAR.iter().map(|e| HelpEntry {
        command: e.command,
        description: e.description,
    })
}

/// Render the whole help surface as one block of text, one entry per line.
pub fn render_help() -> String {
    let mut out = String::from("Available Commands:");
    for entry in help_entries() {
        out.push('\n');
        out.push_str(entry.command);
        out.push_str(" - ");
        out.push_str(entry.description);
    }
    out
}

fn has_word(text: &str, words: &[&str]) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|w| !w.is_empty() && words.contains(&w))
}

const LAMP_WORDS: &[&str] = &["lamp", "light", "lights"];
const SHADER_WORDS: &[&str] = &["shader", "wave", "waves", "grass", "backdrop"];
const CANVAS_WORDS: &[&str] = &["canvas", "easel"];
const PAINT_WORDS: &[&str] = &["paint", "color", "colour", "dye", "recolor"];

fn match_help(t: &str) -> Option<Command> {
    (t == "help" || t == "?").then_some(Command::Help)
}

fn match_greet(t: &str) -> Option<Command> {
    let first = t
        .split(|c: char| !c.is_alphanumeric())
        .find(|w| !w.is_empty())?;
    ["hello", "hi", "hey", "howdy", "yo"]
        .contains(&first)
        .then_some(Command::Greet)
}

fn match_lamp_on(t: &str) -> Option<Command> {
    (has_word(t, LAMP_WORDS) && has_word(t, &["on"])).then_some(Command::SetLamp { on: true })
}

fn match_lamp_off(t: &str) -> Option<Command> {
    (has_word(t, LAMP_WORDS) && has_word(t, &["off", "out"]))
        .then_some(Command::SetLamp { on: false })
}

fn match_lamp_toggle(t: &str) -> Option<Command> {
    // General lamp fallback; on/off variants already had their chance.
    has_word(t, LAMP_WORDS).then_some(Command::ToggleLamp)
}

fn match_paint(t: &str) -> Option<Command> {
    if !has_word(t, PAINT_WORDS) {
        return None;
    }
    match ColorToken::scan(t) {
        Some(color) => Some(Command::Paint(color)),
        // A paint verb with no recognizable color is a failed classification,
        // not a fall-through to the shader entries.
        None => Some(Command::Unrecognized),
    }
}

fn match_shader_off(t: &str) -> Option<Command> {
    (has_word(t, SHADER_WORDS) && has_word(t, &["off", "stop", "clear", "none"]))
        .then_some(Command::SetShader(ShaderMode::None))
}

fn match_shader_waves(t: &str) -> Option<Command> {
    has_word(t, &["wave", "waves"]).then_some(Command::SetShader(ShaderMode::Waves))
}

fn match_shader_grass(t: &str) -> Option<Command> {
    has_word(t, &["grass", "meadow"]).then_some(Command::SetShader(ShaderMode::Grass))
}

fn match_canvas_hide(t: &str) -> Option<Command> {
    (has_word(t, CANVAS_WORDS) && has_word(t, &["close", "hide", "away", "down"]))
        .then_some(Command::SetCanvas { visible: false })
}

fn match_canvas_show(t: &str) -> Option<Command> {
    has_word(t, CANVAS_WORDS).then_some(Command::SetCanvas { visible: true })
}

fn match_reset(t: &str) -> Option<Command> {
    (has_word(t, &["reset", "restart"]) || t.contains("start over") || t.contains("clean slate"))
        .then_some(Command::ResetLab)
}
