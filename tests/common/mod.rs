#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};

use flo::actions::{ActionSurface, LabActions, RoomActions, ShaderMode};
use flo::grammar::color::ColorToken;

#[derive(Default)]
pub struct MockRoom {
    pub lamp_on: AtomicBool,
    pub toggle_calls: AtomicUsize,
    pub set_calls: AtomicUsize,
}

impl RoomActions for MockRoom {
    fn toggle_lamp(&self) -> Result<()> {
        self.toggle_calls.fetch_add(1, Ordering::SeqCst);
        self.lamp_on.fetch_xor(true, Ordering::SeqCst);
        Ok(())
    }

    fn set_lamp_on(&self, on: bool) -> Result<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.lamp_on.store(on, Ordering::SeqCst);
        Ok(())
    }

    fn is_lamp_on(&self) -> Result<bool> {
        Ok(self.lamp_on.load(Ordering::SeqCst))
    }
}

#[derive(Default)]
pub struct MockLab {
    pub colors: Mutex<Vec<ColorToken>>,
    pub shader_modes: Mutex<Vec<ShaderMode>>,
    pub canvas_calls: AtomicUsize,
    pub reset_calls: AtomicUsize,
    /// When set, every shader call fails like a broken host action.
    pub fail_shader: bool,
}

impl LabActions for MockLab {
    fn set_color(&self, color: ColorToken) -> Result<()> {
        self.colors.lock().unwrap().push(color);
        Ok(())
    }

    fn set_shader_mode(&self, mode: ShaderMode) -> Result<()> {
        if self.fail_shader {
            bail!("shader compile blew up");
        }
        self.shader_modes.lock().unwrap().push(mode);
        Ok(())
    }

    fn set_canvas_visible(&self, _visible: bool) -> Result<()> {
        self.canvas_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn reset_lab(&self) -> Result<()> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Capability surface with observable call counts. Sub-surfaces are
/// optional so tests can model office-only or lab-only deployments.
#[derive(Default)]
pub struct MockSurface {
    pub room: Option<MockRoom>,
    pub lab: Option<MockLab>,
}

impl MockSurface {
    pub fn full() -> Self {
        Self {
            room: Some(MockRoom::default()),
            lab: Some(MockLab::default()),
        }
    }

    pub fn office_only() -> Self {
        Self {
            room: Some(MockRoom::default()),
            lab: None,
        }
    }

    pub fn lab_only() -> Self {
        Self {
            room: None,
            lab: Some(MockLab::default()),
        }
    }

    pub fn room_ref(&self) -> &MockRoom {
        self.room.as_ref().expect("mock has no room surface")
    }

    pub fn lab_ref(&self) -> &MockLab {
        self.lab.as_ref().expect("mock has no lab surface")
    }

    /// Total capability calls observed across every sub-surface.
    pub fn total_calls(&self) -> usize {
        let mut calls = 0;
        if let Some(room) = &self.room {
            calls += room.toggle_calls.load(Ordering::SeqCst);
            calls += room.set_calls.load(Ordering::SeqCst);
        }
        if let Some(lab) = &self.lab {
            calls += lab.colors.lock().unwrap().len();
            calls += lab.shader_modes.lock().unwrap().len();
            calls += lab.canvas_calls.load(Ordering::SeqCst);
            calls += lab.reset_calls.load(Ordering::SeqCst);
        }
        calls
    }
}

impl ActionSurface for MockSurface {
    fn room(&self) -> Option<&dyn RoomActions> {
        self.room.as_ref().map(|r| r as &dyn RoomActions)
    }

    fn lab(&self) -> Option<&dyn LabActions> {
        self.lab.as_ref().map(|l| l as &dyn LabActions)
    }
}
