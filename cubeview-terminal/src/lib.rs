/// Terminal front end for the shaded cube
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self},
};
use cubeview_core::{Cube, ProjectionMode, Shader};
use nalgebra::{Point2, Vector2, Vector3};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod input;
pub mod renderer;

pub use config::AppConfig;
pub use input::{Action, DragTracker};
pub use renderer::CellRenderer;

/// Main application struct for terminal cube rendering
pub struct TerminalApp {
    config: AppConfig,
    cube: Cube,
    shader: Shader,
    renderer: CellRenderer,
    drag: DragTracker,
    mode: ProjectionMode,
    coloring: bool,
    shading: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        let (width, height) = terminal::size().context("failed to query terminal size")?;
        Self::with_size(config, width as usize, height as usize)
    }

    /// Build the app for a viewport of `width × height` cells.
    pub fn with_size(config: AppConfig, width: usize, height: usize) -> Result<Self> {
        let renderer = CellRenderer::new(width, height);
        let cube = build_cube(&config, renderer.world_center())?;
        let shader = Shader::new(&config.render.shading_settings).context("invalid shading settings")?;

        Ok(Self {
            drag: DragTracker::new(Duration::from_millis(config.input.drag_sample_ms)),
            mode: config.render.projection,
            coloring: config.render.coloring,
            shading: config.render.shading,
            config,
            cube,
            shader,
            renderer,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.config.render.target_fps.max(1) as u64);

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event, Instant::now());
            }
            if let Some((delta, pointer)) = self.drag.sample(Instant::now()) {
                self.apply_drag(delta, pointer);
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(action) = input::key_action(code, self.cube.length(), &self.config.input) {
                    self.apply(action);
                }
            }
            Event::Mouse(MouseEvent {
                kind,
                column,
                row,
                ..
            }) => {
                let pointer = self.renderer.cell_to_world(column as usize, row as usize);
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => self.drag.press(pointer, now),
                    MouseEventKind::Drag(MouseButton::Left) => self.drag.motion(pointer),
                    MouseEventKind::Up(MouseButton::Left) => {
                        if let Some((delta, pointer)) = self.drag.release() {
                            self.apply_drag(delta, pointer);
                        }
                    }
                    _ => {}
                }
            }
            Event::Resize(width, height) => self.resize(width as usize, height as usize),
            _ => {}
        }
    }

    fn apply_drag(&mut self, delta: Vector2<f64>, pointer: Point2<f64>) {
        let center = self.cube.center();
        let action = input::drag_action(
            delta,
            pointer,
            Point2::new(center.x, center.y),
            self.cube.length(),
        );
        self.apply(action);
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Rotate {
                delta,
                planes,
                reference,
            } => {
                if let Err(e) = self.cube.rotate(&delta, planes, reference) {
                    log::warn!("Ignoring rotation: {}", e);
                }
            }
            Action::Zoom(distance) => {
                let floor = self.config.input.min_screen_distance - distance;
                if distance < 0.0 && self.cube.screen_distance() < floor {
                    log::debug!("Zoom in stopped at screen distance {}", self.cube.screen_distance());
                    return;
                }
                if let Err(e) = self.cube.add_distance(distance) {
                    log::warn!("Ignoring zoom: {}", e);
                }
            }
            Action::ToggleProjection => {
                self.mode = self.mode.toggled();
                log::info!("Projection mode: {:?}", self.mode);
            }
            Action::ToggleColoring => self.coloring = !self.coloring,
            Action::ToggleShading => self.shading = !self.shading,
            Action::Reset => {
                let center = self.cube.center();
                match build_cube(&self.config, Point2::new(center.x, center.y)) {
                    Ok(cube) => self.cube = cube,
                    Err(e) => log::warn!("Reset failed: {:#}", e),
                }
            }
            Action::Quit => self.running = false,
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.renderer.resize(width, height);
        let center = self.renderer.world_center();
        let z = self.cube.center().z;
        self.cube.change_center(Vector3::new(center.x, center.y, z));
    }

    /// Paint the current frame into the cell buffer.
    pub fn paint(&mut self) -> Result<()> {
        let render = &self.config.render;
        self.renderer.clear(render.background);

        if self.coloring {
            for (face, polygon) in self.cube.faces_back_to_front(self.mode) {
                self.renderer.fill_quad(&polygon, render.face_colors.get(face));
                self.renderer.outline_quad(&polygon, render.outline);
            }
        }

        if self.shading {
            for patch in self.shader.shade(&self.cube, self.mode)? {
                self.renderer.blend_quad(&patch.polygon, patch.alpha);
            }
        }
        Ok(())
    }

    pub fn renderer(&self) -> &CellRenderer {
        &self.renderer
    }

    fn render(&mut self) -> Result<()> {
        self.paint()?;

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetBackgroundColor(Color::Black),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "cubeview | {:?} | FPS: {:.1} | screen {:.1} eye {:.1} | Drag/WASD/Arrows=Rotate J/L=Roll N/M=Zoom O/C/H=Toggles R=Reset Q=Quit",
                self.mode,
                self.fps,
                self.cube.screen_distance(),
                self.cube.eye_distance(),
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn build_cube(config: &AppConfig, center: Point2<f64>) -> Result<Cube> {
    let cube = &config.cube;
    Cube::new(
        Vector3::new(center.x, center.y, 0.0),
        cube.side,
        cube.screen_distance,
        cube.eye_distance,
    )
    .context("invalid cube configuration")
}
