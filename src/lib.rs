pub mod camera;
pub mod config;
pub mod controls;
pub mod scene;
pub mod sizes;
pub mod transform;

pub use camera::Camera;
pub use config::{ConfigError, Settings};
pub use controls::{Controls, Input, Key};
pub use scene::Quad;
pub use sizes::{SizeRequest, WindowSize, WindowSizes};
