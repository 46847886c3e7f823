use crate::camera::{Camera, Movement};
use crate::config::{ConfigError, Settings};
use crate::sizes::{SizeRequest, WindowSizes};

/// Keys the demo reacts to, independent of the windowing library.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    F11,
    Up,
    Down,
    Escape,
    W,
    A,
    S,
    D,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Input {
    /// Window close request.
    Quit,
    /// Relative pointer motion.
    Look { dx: f32, dy: f32 },
    KeyDown(Key),
}

/// Camera, window size selection and the running flag, updated from input.
#[derive(Debug, Clone)]
pub struct Controls {
    pub camera: Camera,
    pub sizes: WindowSizes,
    walk_speed: f32,
    rotation_speed: f32,
    running: bool,
}

impl Controls {
    pub fn new(camera: Camera, sizes: WindowSizes, walk_speed: f32, rotation_speed: f32) -> Self {
        Self {
            camera,
            sizes,
            walk_speed,
            rotation_speed,
            running: true,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self::new(
            Camera::new(),
            settings.window_sizes()?,
            settings.walk_speed,
            settings.rotation_speed,
        ))
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Applies one input, returning the window change it asks for.
    pub fn handle(&mut self, input: Input) -> Option<SizeRequest> {
        match input {
            Input::Quit => {
                self.running = false;
                None
            }
            Input::Look { dx, dy } => {
                self.camera.look(dx, dy, self.rotation_speed);
                None
            }
            Input::KeyDown(key) => self.key_down(key),
        }
    }

    fn key_down(&mut self, key: Key) -> Option<SizeRequest> {
        match key {
            Key::F11 => Some(self.sizes.toggle_fullscreen()),
            Key::Up => self.sizes.grow(),
            Key::Down => self.sizes.shrink(),
            Key::Escape => {
                self.running = false;
                None
            }
            Key::W => self.walk(Movement::Forward),
            Key::S => self.walk(Movement::Backward),
            Key::A => self.walk(Movement::Left),
            Key::D => self.walk(Movement::Right),
        }
    }

    fn walk(&mut self, movement: Movement) -> Option<SizeRequest> {
        self.camera.walk(movement, self.walk_speed);
        None
    }
}
