use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::panic::{self, AssertUnwindSafe};

use cgmath::Matrix4;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use thiserror::Error;

use winit::dpi::{PhysicalPosition, PhysicalSize, Size};
use winit::event::{DeviceEvent, ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::{CursorGrabMode, Fullscreen, Window, WindowBuilder};

use colour_square::config::{ConfigError, Settings};
use colour_square::controls::{Controls, Input, Key};
use colour_square::scene::Quad;
use colour_square::sizes::{centred, matching_mode, SizeRequest, WindowSize};
use colour_square::transform::{model_view_projection, quad_model};

use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{Program, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;

pub struct App {
    // dropped before the event loop, see `run`
    session: Session,
    event_loop: EventLoop<()>,
}

impl App {
    pub fn new(settings: Settings, seed: Option<u64>) -> Result<Self, AppError> {
        let controls = Controls::from_settings(&settings)?;
        let start_size = controls.sizes.current();

        let event_loop = catch_init(EventLoop::new).map_err(AppError::Display)?;
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                start_size.width,
                start_size.height,
            )))
            .with_resizable(false)
            .with_title(&settings.title);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new().with_depth_size(24);

        let (window, gl_config) = catch_init(|| {
            display_builder.build(&event_loop, template, |configs| first_config(configs))
        })
        .map_err(AppError::Display)?
        .map_err(|e| AppError::Display(e.to_string()))?;
        let window = window.ok_or(AppError::NoWindow)?;

        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        gl::load_with(|s| match CString::new(s) {
            Ok(symbol) => gl_display.get_proc_address(&symbol).cast(),
            Err(_) => std::ptr::null(),
        });

        if !gl_wrapper::is_loaded() {
            tracing::error!("could not load the OpenGL entry points");
        }

        tracing::info!(
            width = start_size.width,
            height = start_size.height,
            "window and context ready"
        );

        let program = ProgramBuilder::from_files(&settings.vertex_shader, &settings.fragment_shader)
            .and_then(ProgramBuilder::build);
        let program = match program {
            Ok(program) => Some(program),
            Err(e) => {
                tracing::error!("shader program unavailable, nothing will be drawn: {e}");
                None
            }
        };

        let transform_location = program
            .as_ref()
            .and_then(|p| p.uniform_location("transform"));
        if program.is_some() && transform_location.is_none() {
            tracing::warn!("shader program has no `transform` uniform");
        }

        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let quad = Quad::random(&mut rng);
        tracing::debug!(?quad, "generated quad");

        let data = quad.vertex_data();
        let geometry = GeometryBuilder::new(&data)
            .with_attribute(VertexAttribute::Vec3)
            .with_attribute(VertexAttribute::Vec3)
            .with_indices(quad.indices())
            .build()?;

        let engine = Engine {
            quad: geometry,
            program,
            transform_location,
            renderer: GlRenderer::new(),
            gl_context,
            gl_window,
        };

        engine.set_window_size(start_size);
        engine.grab_cursor();

        let session = Session {
            engine,
            controls,
            model: quad_model(),
            projection: settings.projection.matrix(),
            clear_color: settings.clear_color,
            focused: true,
        };

        Ok(Self {
            session,
            event_loop,
        })
    }

    /// Runs the frame loop until the user quits, then releases everything.
    pub fn run(self) {
        let Self {
            mut session,
            mut event_loop,
        } = self;

        tracing::info!("entering frame loop");

        event_loop.run_return(|event, _window_target, control_flow| {
            session.handle_event(event, control_flow);
        });

        tracing::info!("shutting down");

        // GL objects and the window go before the windowing system
        drop(session);
        drop(event_loop);
    }
}

struct Session {
    engine: Engine,
    controls: Controls,
    model: Matrix4<f32>,
    projection: Matrix4<f32>,
    clear_color: [f32; 3],
    focused: bool,
}

impl Session {
    fn handle_event(&mut self, event: Event<'_, ()>, control_flow: &mut ControlFlow) {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::MainEventsCleared => self.engine.gl_window.window.request_redraw(),
            Event::RedrawRequested(_) => self.draw(),
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => self.dispatch(Input::Quit),
                WindowEvent::Focused(focused) => self.focused = focused,
                WindowEvent::Resized(size) => self.engine.resize_surface(size),
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(code),
                            ..
                        },
                    ..
                } => {
                    if let Some(key) = map_key(code) {
                        self.dispatch(Input::KeyDown(key));
                    }
                }
                _ => (),
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta: (dx, dy) },
                ..
            } => {
                if self.focused {
                    self.dispatch(Input::Look {
                        dx: dx as f32,
                        dy: dy as f32,
                    });
                }
            }
            _ => (),
        }

        if !self.controls.is_running() {
            control_flow.set_exit();
        }
    }

    fn dispatch(&mut self, input: Input) {
        if let Some(request) = self.controls.handle(input) {
            tracing::debug!(?request, "window size change");
            self.engine.apply(request);
        }
    }

    fn draw(&mut self) {
        let view = self.controls.camera.view();
        let mvp = model_view_projection(&self.projection, &view, &self.model);

        self.engine.draw(&mvp, self.clear_color);
    }
}

/// GL state of the process. Fields drop in declaration order: buffers,
/// program, context, then surface and window.
struct Engine {
    quad: Geometry,
    program: Option<Program>,
    transform_location: Option<i32>,
    renderer: GlRenderer,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
}

impl Engine {
    fn apply(&self, request: SizeRequest) {
        let window = &self.gl_window.window;

        match request {
            SizeRequest::Fullscreen(size) => {
                self.set_window_size(size);

                let mode = window.current_monitor().and_then(|monitor| {
                    matching_mode(monitor.video_modes(), size, |mode| {
                        let s = mode.size();
                        WindowSize::new(s.width, s.height)
                    })
                });
                let fullscreen = match mode {
                    Some(mode) => Fullscreen::Exclusive(mode),
                    None => {
                        tracing::warn!(
                            width = size.width,
                            height = size.height,
                            "monitor has no matching video mode, using borderless fullscreen"
                        );
                        Fullscreen::Borderless(None)
                    }
                };
                window.set_fullscreen(Some(fullscreen));
            }
            SizeRequest::Windowed(size) => {
                window.set_fullscreen(None);
                self.set_window_size(size);
            }
        }
    }

    fn set_window_size(&self, size: WindowSize) {
        let window = &self.gl_window.window;

        window.set_inner_size(PhysicalSize::new(size.width, size.height));
        self.renderer.resize(size.width, size.height);

        if let Some(monitor) = window.current_monitor() {
            let area = monitor.size();
            let origin = monitor.position();
            let (x, y) = centred(
                (origin.x, origin.y),
                WindowSize::new(area.width, area.height),
                size,
            );

            window.set_outer_position(PhysicalPosition::new(x, y));
        }
    }

    fn resize_surface(&self, size: PhysicalSize<u32>) {
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            self.gl_window
                .surface
                .resize(&self.gl_context, width, height);
            self.renderer.resize(size.width, size.height);
        }
    }

    fn grab_cursor(&self) {
        let window = &self.gl_window.window;

        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grabbed {
            tracing::warn!("could not grab the cursor: {e}");
        }

        window.set_cursor_visible(false);
    }

    fn draw(&mut self, mvp: &Matrix4<f32>, clear_color: [f32; 3]) {
        let [r, g, b] = clear_color;
        self.renderer.clear_color(r, g, b);

        if let Some(program) = &self.program {
            self.renderer.use_program(program);
            if let Some(location) = self.transform_location {
                program.set_mat4(location, mvp.as_ref());
            }

            self.renderer.draw(&self.quad, program);
        }

        if let Err(e) = self.gl_window.surface.swap_buffers(&self.gl_context) {
            tracing::error!("could not present frame: {e}");
        }
    }
}

pub struct GlWindow {
    // must be dropped before the window it draws into
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let (width, height) = NonZeroU32::new(width)
            .zip(NonZeroU32::new(height))
            .ok_or_else(|| AppError::Surface("window has no drawable area".into()))?;

        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window.raw_window_handle(),
            width,
            height,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs) }
            .map_err(|e| AppError::Surface(e.to_string()))?;

        Ok(Self { window, surface })
    }
}

fn map_key(code: VirtualKeyCode) -> Option<Key> {
    match code {
        VirtualKeyCode::F11 => Some(Key::F11),
        VirtualKeyCode::Up => Some(Key::Up),
        VirtualKeyCode::Down => Some(Key::Down),
        VirtualKeyCode::Escape => Some(Key::Escape),
        VirtualKeyCode::W => Some(Key::W),
        VirtualKeyCode::A => Some(Key::A),
        VirtualKeyCode::S => Some(Key::S),
        VirtualKeyCode::D => Some(Key::D),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Display(String),
    #[error("the platform did not create a window")]
    NoWindow,
    #[error("{0}")]
    Context(#[from] glutin::error::Error),
    #[error("{0}")]
    Surface(String),
    #[error("{0}")]
    Geometry(#[from] GBError),
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Title of the error dialog.
    pub fn title(&self) -> &'static str {
        match self {
            AppError::Display(_) => "Windowing initialisation failed",
            AppError::NoWindow => "Window creation failed",
            AppError::Context(_) => "OpenGL context creation failed",
            AppError::Surface(_) => "Window surface creation failed",
            AppError::Geometry(_) => "Scene upload failed",
            AppError::Config(_) => "Invalid settings",
        }
    }
}

const NO_CONFIG: &str = "no GL config matches the requested depth buffer";

/// GL config picker. The picker has to return a config, so an empty list
/// can only be reported by panicking; `App::new` catches it.
fn first_config<C>(mut configs: impl Iterator<Item = C>) -> C {
    match configs.next() {
        Some(config) => config,
        None => panic!("{NO_CONFIG}"),
    }
}

/// Runs a startup step that reports failure by panicking and returns the
/// panic message instead.
fn catch_init<T>(step: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(step)).map_err(|payload| {
        if let Some(msg) = payload.downcast_ref::<&str>() {
            msg.to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "startup step failed".to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_demo_keys_are_mapped() {
        assert_eq!(map_key(VirtualKeyCode::F11), Some(Key::F11));
        assert_eq!(map_key(VirtualKeyCode::Escape), Some(Key::Escape));
        assert_eq!(map_key(VirtualKeyCode::W), Some(Key::W));
        assert_eq!(map_key(VirtualKeyCode::D), Some(Key::D));

        assert_eq!(map_key(VirtualKeyCode::Q), None);
        assert_eq!(map_key(VirtualKeyCode::F12), None);
        assert_eq!(map_key(VirtualKeyCode::Left), None);
    }

    #[test]
    fn startup_panics_become_errors() {
        assert_eq!(catch_init(|| 7), Ok(7));
        assert_eq!(
            catch_init(|| -> u8 { panic!("no display") }),
            Err("no display".to_string())
        );
        assert_eq!(
            catch_init(|| -> u8 { panic!("{} display", "no") }),
            Err("no display".to_string())
        );

        let err = catch_init(EventLoopless::new).map_err(AppError::Display);
        assert!(matches!(err, Err(AppError::Display(ref msg)) if msg == "event loop unavailable"));
    }

    #[test]
    fn empty_config_list_is_reported() {
        assert_eq!(first_config([3, 4].into_iter()), 3);

        let err = catch_init(|| first_config(std::iter::empty::<u8>())).unwrap_err();
        assert_eq!(err, NO_CONFIG);
    }

    // stands in for a constructor that panics when the platform refuses it
    struct EventLoopless;

    impl EventLoopless {
        fn new() -> Self {
            panic!("event loop unavailable")
        }
    }

    #[test]
    fn config_errors_get_their_own_title() {
        let err = AppError::from(ConfigError::Invalid("speeds must be positive".into()));

        assert_eq!(err.title(), "Invalid settings");
        assert_eq!(err.to_string(), "invalid settings: speeds must be positive");
    }
}
