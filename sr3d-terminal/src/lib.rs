/// Terminal front end: frame loop, input and HUD around the sr3d pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::Vector3;
use sr3d_core::{Scene, DEFAULT_DRAG, DEFAULT_RENDER_DISTANCE};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod player;
pub mod renderer;

pub use player::{Player, PlayerInput};
pub use renderer::CellRenderer;

/// Angular velocity given to the first model with `--spin`.
pub const DEMO_SPIN: [f32; 3] = [0.007, 0.0, 0.01];

/// Runtime settings collected from the command line.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub target_fps: u32,
    pub drag: f32,
    pub render_distance: f32,
    pub spin: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            drag: DEFAULT_DRAG,
            render_distance: DEFAULT_RENDER_DISTANCE,
            spin: false,
        }
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    player: Player,
    renderer: CellRenderer,
    config: AppConfig,
    input: PlayerInput,
    debug_overlay: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, start: Vector3<f32>, config: AppConfig) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        Ok(Self::with_size(scene, start, config, columns, rows))
    }

    /// App for a terminal of `columns` x `rows` cells.
    pub fn with_size(
        mut scene: Scene,
        start: Vector3<f32>,
        config: AppConfig,
        columns: u16,
        rows: u16,
    ) -> Self {
        if config.spin {
            if let Some(model) = scene.iter_mut().next() {
                model.angular_velocity = Vector3::from(DEMO_SPIN);
                debug!(name = %model.name, "spinning model");
            }
        }

        let mut player = Player::new(start);
        player.camera.render_distance = config.render_distance;

        Self {
            scene,
            player,
            renderer: CellRenderer::new(columns as usize, rows as usize),
            config,
            input: PlayerInput::default(),
            debug_overlay: false,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn renderer(&self) -> &CellRenderer {
        &self.renderer
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time =
            Duration::from_millis(1000 / u64::from(self.config.target_fps.max(1)));
        info!(models = self.scene.len(), fps = self.config.target_fps, "render loop started");

        while self.running {
            let frame_start = Instant::now();

            self.handle_input()?;
            self.update();
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

        info!("render loop stopped");
        Ok(())
    }

    /// Drain pending events into this frame's input.
    fn handle_input(&mut self) -> io::Result<()> {
        self.input = PlayerInput::default();

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                    self.handle_key(code)
                }
                Event::Resize(columns, rows) => {
                    debug!(columns, rows, "terminal resized");
                    self.renderer = CellRenderer::new(columns as usize, rows as usize);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('1') => {
                self.debug_overlay = !self.debug_overlay;
                info!(enabled = self.debug_overlay, "debug overlay toggled");
            }
            KeyCode::Char('w') => self.input.forward = true,
            KeyCode::Char('s') => self.input.back = true,
            KeyCode::Char('a') => self.input.strafe_left = true,
            KeyCode::Char('d') => self.input.strafe_right = true,
            KeyCode::Left => self.input.turn_left = true,
            KeyCode::Right => self.input.turn_right = true,
            KeyCode::Up => self.input.look_up = true,
            KeyCode::Down => self.input.look_down = true,
            KeyCode::Char(' ') => self.input.rise = true,
            KeyCode::Char('c') => self.input.sink = true,
            _ => {}
        }
    }

    fn update(&mut self) {
        self.player.apply_input(&self.input);
        self.player.update(&self.scene);
        self.scene.physics_step(self.config.drag);
        self.scene.prepare_frame(&self.player.position);
    }

    /// Rasterize the current scene into the cell buffer. Returns the number
    /// of triangles drawn.
    fn compose(&mut self) -> usize {
        let (width, height) = self.renderer.pixel_size();
        let frame = self.scene.render(&self.player.camera, width, height);

        self.renderer.clear();
        self.renderer.draw_frame(&frame);
        self.renderer.crosshair();
        if self.debug_overlay {
            self.label_vertices(width, height);
        }
        frame.len()
    }

    fn render(&mut self) -> io::Result<()> {
        let triangles = self.compose();

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let p = self.player.position;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "SR3D | FPS: {:.1} | tris: {} | pos: ({:.2}, {:.2}, {:.2}) | WASD move, arrows look, space/c up/down, 1 debug, Q quit",
                self.fps,
                triangles,
                p.x,
                p.y,
                p.z
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    /// Overlay each visible vertex with its index.
    fn label_vertices(&mut self, width: f32, height: f32) {
        let camera = &self.player.camera;
        for model in self.scene.iter() {
            let points = camera.project_vertices(model, width);
            for (index, point) in points.iter().enumerate() {
                if point.is_visible() {
                    self.renderer
                        .label(point.x + width / 2.0, point.y + height / 2.0, index.to_string());
                }
            }
        }
    }
}
