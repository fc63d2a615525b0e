//! Input mapping
//!
//! Translates key presses and mouse drags into cube actions. Nothing here
//! touches the terminal, so the bindings can be tested directly.

use crossterm::event::KeyCode;
use cubeview_core::RotationPlanes;
use nalgebra::{Point2, Vector2};
use std::f64::consts::SQRT_2;
use std::time::{Duration, Instant};

use crate::config::InputConfig;

/// Something the user asked the app to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Rotate {
        delta: [f64; 2],
        planes: RotationPlanes,
        reference: Option<Point2<f64>>,
    },
    /// Move screen and eye by this distance; negative zooms in
    Zoom(f64),
    ToggleProjection,
    ToggleColoring,
    ToggleShading,
    Reset,
    Quit,
}

/// Map a key press to an action for a cube of edge `side`.
pub fn key_action(code: KeyCode, side: f64, input: &InputConfig) -> Option<Action> {
    let quarter = side / SQRT_2;
    let step = side / input.key_step_divisor;

    let turn = |dx: f64, dy: f64, planes: RotationPlanes| Action::Rotate {
        delta: [dx, dy],
        planes,
        reference: None,
    };

    let action = match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('a') => turn(quarter, 0.0, RotationPlanes::XZ),
        KeyCode::Char('d') => turn(-quarter, 0.0, RotationPlanes::XZ),
        KeyCode::Char('w') => turn(0.0, -quarter, RotationPlanes::YZ),
        KeyCode::Char('s') => turn(0.0, quarter, RotationPlanes::YZ),
        KeyCode::Left => turn(step, 0.0, RotationPlanes::XZ),
        KeyCode::Right => turn(-step, 0.0, RotationPlanes::XZ),
        KeyCode::Up => turn(0.0, -step, RotationPlanes::YZ),
        KeyCode::Down => turn(0.0, step, RotationPlanes::YZ),
        KeyCode::Char('j') => turn(step, step, RotationPlanes::XY),
        KeyCode::Char('l') => turn(-step, -step, RotationPlanes::XY),
        KeyCode::Char('n') => Action::Zoom(-input.zoom_step),
        KeyCode::Char('m') => Action::Zoom(input.zoom_step),
        KeyCode::Char('o') => Action::ToggleProjection,
        KeyCode::Char('c') => Action::ToggleColoring,
        KeyCode::Char('h') => Action::ToggleShading,
        KeyCode::Char('r') => Action::Reset,
        _ => return None,
    };
    Some(action)
}

/// Pick the rotation for a drag sampled at `pointer`.
///
/// Grabbing the cube itself turns it in depth; grabbing beside it rolls it
/// in the screen plane towards the pointer.
pub fn drag_action(delta: Vector2<f64>, pointer: Point2<f64>, center: Point2<f64>, side: f64) -> Action {
    let reach = side / SQRT_2;
    let offset = pointer - center;
    // Horizontal drags turn the opposite way to the pointer motion.
    let delta = [-delta.x, delta.y];

    if offset.x.abs() < reach && offset.y.abs() < reach {
        Action::Rotate {
            delta,
            planes: RotationPlanes::XZ | RotationPlanes::YZ,
            reference: None,
        }
    } else {
        Action::Rotate {
            delta,
            planes: RotationPlanes::XY,
            reference: Some(pointer),
        }
    }
}

/// Accumulates pointer motion of a press-and-drag gesture and releases it
/// once per sampling interval, so rotation speed does not depend on how
/// often the terminal reports motion.
#[derive(Debug, Clone)]
pub struct DragTracker {
    interval: Duration,
    pressed: bool,
    pointer: Point2<f64>,
    pending: Vector2<f64>,
    last_sample: Instant,
}

impl DragTracker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pressed: false,
            pointer: Point2::origin(),
            pending: Vector2::zeros(),
            last_sample: Instant::now(),
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn press(&mut self, pointer: Point2<f64>, now: Instant) {
        self.pressed = true;
        self.pointer = pointer;
        self.pending = Vector2::zeros();
        self.last_sample = now;
    }

    pub fn motion(&mut self, pointer: Point2<f64>) {
        if self.pressed {
            self.pending += pointer - self.pointer;
            self.pointer = pointer;
        }
    }

    /// End the gesture, returning whatever motion has not been sampled yet.
    pub fn release(&mut self) -> Option<(Vector2<f64>, Point2<f64>)> {
        if !self.pressed {
            return None;
        }
        self.pressed = false;
        self.take()
    }

    /// Motion gathered since the last sample, once the interval has passed.
    pub fn sample(&mut self, now: Instant) -> Option<(Vector2<f64>, Point2<f64>)> {
        if !self.pressed || now.duration_since(self.last_sample) < self.interval {
            return None;
        }
        self.last_sample = now;
        self.take()
    }

    fn take(&mut self) -> Option<(Vector2<f64>, Point2<f64>)> {
        let delta = std::mem::replace(&mut self.pending, Vector2::zeros());
        (delta != Vector2::zeros()).then_some((delta, self.pointer))
    }
}
