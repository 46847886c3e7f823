use cgmath::{Deg, InnerSpace, Matrix4, Rad, SquareMatrix, Vector3, Zero};
use serde::Deserialize;

/// Rotates, then scales, then translates `object`, each step in the
/// object's own space.
pub fn apply_transformation(
    object: Matrix4<f32>,
    rotation: Rad<f32>,
    axis: Vector3<f32>,
    scale: Vector3<f32>,
    translation: Vector3<f32>,
) -> Matrix4<f32> {
    object
        * Matrix4::from_axis_angle(axis.normalize(), rotation)
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
        * Matrix4::from_translation(translation)
}

/// Fixed model transform of the quad.
///
/// The angle is a literal 90 radians, not degrees.
pub fn quad_model() -> Matrix4<f32> {
    apply_transformation(
        Matrix4::identity(),
        Rad(90.0),
        Vector3::unit_z(),
        Vector3::new(0.5, 0.5, 0.5),
        Vector3::zero(),
    )
}

pub fn model_view_projection(
    projection: &Matrix4<f32>,
    view: &Matrix4<f32>,
    model: &Matrix4<f32>,
) -> Matrix4<f32> {
    projection * view * model
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self) -> Matrix4<f32> {
        cgmath::perspective(Deg(self.fov_y), self.aspect, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: 45.0,
            aspect: 4.0 / 3.0,
            near: 0.1,
            far: 100.0,
        }
    }
}
