use std::io::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use flo::actions::{ActionSurface, LabActions, RoomActions, ShaderMode};
use flo::clock::TokioClock;
use flo::grammar::color::ColorToken;
use flo::session::{Session, SessionConfig, SessionEvent};
use flo::session::transcript::Speaker;

/// Headless stand-in for the animated scene: a lamp, a shader backdrop, a
/// brush color and a canvas flag. Effects show up as log lines.
#[derive(Default)]
struct DemoRoom {
    lamp_on: AtomicBool,
    canvas_visible: AtomicBool,
    shader: Mutex<ShaderMode>,
    color: Mutex<Option<ColorToken>>,
}

impl RoomActions for DemoRoom {
    fn toggle_lamp(&self) -> anyhow::Result<()> {
        let was = self.lamp_on.fetch_xor(true, Ordering::SeqCst);
        info!(lamp_on = !was, "lamp toggled");
        Ok(())
    }

    fn set_lamp_on(&self, on: bool) -> anyhow::Result<()> {
        self.lamp_on.store(on, Ordering::SeqCst);
        info!(lamp_on = on, "lamp set");
        Ok(())
    }

    fn is_lamp_on(&self) -> anyhow::Result<bool> {
        Ok(self.lamp_on.load(Ordering::SeqCst))
    }
}

impl LabActions for DemoRoom {
    fn set_color(&self, color: ColorToken) -> anyhow::Result<()> {
        let mut slot = self.color.lock().map_err(|_| anyhow!("color lock poisoned"))?;
        *slot = Some(color);
        info!(color = color.name(), "backdrop recolored");
        Ok(())
    }

    fn set_shader_mode(&self, mode: ShaderMode) -> anyhow::Result<()> {
        let mut slot = self.shader.lock().map_err(|_| anyhow!("shader lock poisoned"))?;
        *slot = mode;
        info!(?mode, "shader mode set");
        Ok(())
    }

    fn set_canvas_visible(&self, visible: bool) -> anyhow::Result<()> {
        self.canvas_visible.store(visible, Ordering::SeqCst);
        info!(visible, "canvas visibility set");
        Ok(())
    }

    fn reset_lab(&self) -> anyhow::Result<()> {
        self.lamp_on.store(false, Ordering::SeqCst);
        self.canvas_visible.store(false, Ordering::SeqCst);
        *self.shader.lock().map_err(|_| anyhow!("shader lock poisoned"))? = ShaderMode::None;
        *self.color.lock().map_err(|_| anyhow!("color lock poisoned"))? = None;
        info!("lab reset to defaults");
        Ok(())
    }
}

impl ActionSurface for DemoRoom {
    fn room(&self) -> Option<&dyn RoomActions> {
        Some(self)
    }

    fn lab(&self) -> Option<&dyn LabActions> {
        Some(self)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let room = Arc::new(DemoRoom::default());
    let mut session = Session::new(room, Arc::new(TokioClock), SessionConfig::default());
    let mut events = session.events();

    // Mirror the session feed onto stdout: partial prefixes redraw the
    // current line, completed turns commit it.
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::Partial(prefix) => {
                    print!("\rFlo: {prefix}");
                    let _ = std::io::stdout().flush();
                }
                SessionEvent::TurnAppended(turn) => match turn.speaker {
                    Speaker::Assistant => println!(),
                    Speaker::System => {
                        for line in turn.text.lines() {
                            println!("// {line}");
                        }
                    }
                    Speaker::User => {}
                },
            }
        }
    });

    session.greet().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("$ ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim() == "exit" || line.trim() == "quit" {
            break;
        }
        session.submit(&line).await;
    }

    println!("{}", serde_json::to_string_pretty(session.transcript())?);
    Ok(())
}
