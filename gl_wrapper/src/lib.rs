pub mod geometry;
pub mod program;
pub mod renderer;

/// Whether the entry points the wrappers rely on were resolved by `gl::load_with`.
pub fn is_loaded() -> bool {
    gl::CreateShader::is_loaded()
        && gl::CreateProgram::is_loaded()
        && gl::GenVertexArrays::is_loaded()
        && gl::GenBuffers::is_loaded()
        && gl::DrawElements::is_loaded()
        && gl::UniformMatrix4fv::is_loaded()
}
