/// Terminal host for the STL viewer component
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod framing;
pub mod indicator;
pub mod loader;
pub mod renderer;
pub mod viewer;

pub use config::{AutoRotate, ConfigError, ViewerConfig};
pub use viewer::{StlViewer, ViewerHandle};

/// Orbit sensitivity for pointer drags, radians per cell
const DRAG_SENSITIVITY: f32 = 0.05;
/// Orbit step for a single key press, radians
const KEY_ROTATE_STEP: f32 = 0.1;
/// Dolly step for one scroll notch
const SCROLL_ZOOM_STEP: f32 = 0.5;

/// Drives a mounted viewer against a crossterm terminal: event polling,
/// resize observation, and a fixed-rate frame loop that runs until the
/// viewer's handle is unmounted.
pub struct TerminalHost {
    viewer: StlViewer,
    handle: ViewerHandle,
    mouse_pressed: bool,
    last_mouse_pos: Option<(u16, u16)>,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalHost {
    /// Mount a viewer for the current terminal. Fails when the required
    /// `model` attribute is missing.
    pub fn mount<'a, I>(attrs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let measured = terminal::size().unwrap_or((0, 0));
        let viewer = StlViewer::mount(attrs, measured)?;
        let handle = viewer.handle();

        Ok(Self {
            viewer,
            handle,
            mouse_pressed: false,
            last_mouse_pos: None,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn handle(&self) -> ViewerHandle {
        self.handle.clone()
    }

    pub fn run(&mut self) -> io::Result<()> {
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

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        loop {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Legacy resize path: re-measure every frame; harmless when the
            // size has not changed
            let measured = terminal::size()?;

            // Update; the frame step reports whether the loop continues
            if !self.viewer.frame(measured) {
                break;
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

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Resize(width, height) => {
                self.viewer.resize(width, height);
            }
            Event::Key(KeyEvent { code, .. }) => self.handle_key(code),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.viewer.abort_load();
                self.handle.unmount();
            }
            KeyCode::Char('w') | KeyCode::Up => self.orbit(0.0, KEY_ROTATE_STEP),
            KeyCode::Char('s') | KeyCode::Down => self.orbit(0.0, -KEY_ROTATE_STEP),
            KeyCode::Char('a') | KeyCode::Left => self.orbit(-KEY_ROTATE_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.orbit(KEY_ROTATE_STEP, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.dolly(SCROLL_ZOOM_STEP),
            KeyCode::Char('-') => self.dolly(-SCROLL_ZOOM_STEP),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.mouse_pressed = true;
                self.last_mouse_pos = Some((mouse.column, mouse.row));
                self.viewer.interaction_started();
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.mouse_pressed {
                    if let Some((px, py)) = self.last_mouse_pos {
                        let dx = mouse.column as f32 - px as f32;
                        let dy = mouse.row as f32 - py as f32;
                        self.orbit(-dx * DRAG_SENSITIVITY, dy * DRAG_SENSITIVITY);
                    }
                    self.last_mouse_pos = Some((mouse.column, mouse.row));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.mouse_pressed = false;
                self.last_mouse_pos = None;
            }
            MouseEventKind::ScrollUp => self.dolly(SCROLL_ZOOM_STEP),
            MouseEventKind::ScrollDown => self.dolly(-SCROLL_ZOOM_STEP),
            _ => {}
        }
    }

    fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.viewer.interaction_started();
        self.viewer.rotate(delta_yaw, delta_pitch);
    }

    fn dolly(&mut self, delta: f32) {
        self.viewer.interaction_started();
        self.viewer.zoom(delta);
    }

    fn render(&mut self) -> io::Result<()> {
        let mut stdout = stdout();

        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        self.viewer.draw(&mut stdout)?;

        // Status overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "STLView | FPS: {:.1} | Drag/WASD=Orbit Scroll=Zoom Q=Quit",
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
