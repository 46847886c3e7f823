use cgmath::{Deg, InnerSpace, Matrix3, Matrix4, Point3, Vector3};

/// Direction the camera faces before any yaw or pitch is applied.
pub const FACING: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

/// Pitch rotates about negative X, so moving the pointer up looks up.
const PITCH_AXIS: Vector3<f32> = Vector3 {
    x: -1.0,
    y: 0.0,
    z: 0.0,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// First person camera driven by accumulated yaw and pitch.
///
/// `forward` is never integrated; every look update rebuilds it from the
/// angles, so it cannot drift away from unit length.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vector3<f32>,
    pub up: Vector3<f32>,
    /// Strafe axis. Fixed in world space, it does not turn with the camera.
    pub right: Vector3<f32>,
    forward: Vector3<f32>,
    yaw: f32,
    pitch: f32,
}

impl Camera {
    /// Camera at `(0, 0, -2)` with zero yaw and pitch. `forward` is derived
    /// from those angles, so it starts at `FACING` and looks at the quad.
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, -2.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            right: Vector3::new(1.0, 0.0, 0.0),
            forward: facing(0.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    /// Accumulated yaw in degrees.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Accumulated pitch in degrees.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Applies relative pointer motion, `sensitivity` is in degrees per unit.
    pub fn look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw -= dx * sensitivity;
        self.pitch -= dy * sensitivity;

        self.forward = facing(self.yaw, self.pitch);
    }

    pub fn walk(&mut self, movement: Movement, step: f32) {
        match movement {
            Movement::Forward => self.position += self.forward * step,
            Movement::Backward => self.position -= self.forward * step,
            Movement::Left => self.position += self.right * step,
            Movement::Right => self.position -= self.right * step,
        }
    }

    pub fn view(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.position.x, self.position.y, self.position.z);

        Matrix4::look_at_rh(eye, eye + self.forward, self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

fn facing(yaw: f32, pitch: f32) -> Vector3<f32> {
    // pitch on the left, yaw on the right: yaw turns the facing vector
    // about world Y first, pitch then tilts the result
    let rotation = Matrix3::from_axis_angle(PITCH_AXIS, Deg(pitch)) * Matrix3::from_angle_y(Deg(yaw));

    (rotation * FACING).normalize()
}
