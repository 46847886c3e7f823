use gl::types::{GLenum, GLint, GLuint};
use std::ffi::{c_char, CString, NulError};
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOG_LEN: usize = 1024;

pub struct ProgramBuilder {
    vert: String,
    frag: String,
}

impl ProgramBuilder {
    pub fn new(vert_src: &str, frag_src: &str) -> Self {
        Self {
            vert: vert_src.to_owned(),
            frag: frag_src.to_owned(),
        }
    }

    /// Reads both stages from disk.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(vert: P, frag: Q) -> Result<Self, PBError> {
        Ok(Self {
            vert: read_source(vert.as_ref())?,
            frag: read_source(frag.as_ref())?,
        })
    }

    pub fn build(self) -> Result<Program, PBError> {
        let vert_src = CString::new(self.vert)?;
        let frag_src = CString::new(self.frag)?;

        tracing::info!("compiling vertex shader");
        let vert = compile(gl::VERTEX_SHADER, &vert_src)?;

        tracing::info!("compiling fragment shader");
        let frag = match compile(gl::FRAGMENT_SHADER, &frag_src) {
            Ok(frag) => frag,
            Err(e) => {
                unsafe { gl::DeleteShader(vert) };
                return Err(e);
            }
        };

        tracing::info!("linking program");

        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            let mut success: GLint = 0;
            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut i32);

            let res = if success != 1 {
                let mut buf = [0_u8; LOG_LEN];
                gl::GetProgramInfoLog(
                    program,
                    LOG_LEN as i32,
                    std::ptr::null_mut(),
                    buf.as_mut_ptr() as *mut c_char,
                );
                gl::DeleteProgram(program);

                Err(PBError::Linking(log_message(&buf)))
            } else {
                gl::DetachShader(program, vert);
                gl::DetachShader(program, frag);

                Ok(Program { id: program })
            };

            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            res
        }
    }
}

fn read_source(path: &Path) -> Result<String, PBError> {
    std::fs::read_to_string(path).map_err(|source| PBError::Read {
        path: path.to_owned(),
        source,
    })
}

fn compile(kind: GLenum, src: &CString) -> Result<GLuint, PBError> {
    let mut success: GLint = 0;

    unsafe {
        let shader = gl::CreateShader(kind);

        gl::ShaderSource(
            shader,
            1,
            (&src.as_ptr()) as *const *const c_char,
            std::ptr::null(),
        );

        gl::CompileShader(shader);
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut i32);
        if success != 1 {
            let mut buf = [0_u8; LOG_LEN];
            gl::GetShaderInfoLog(
                shader,
                LOG_LEN as i32,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut c_char,
            );
            gl::DeleteShader(shader);

            return Err(PBError::Compilation(log_message(&buf)));
        }

        Ok(shader)
    }
}

/// Text of a NUL terminated info log.
fn log_message(buf: &[u8]) -> String {
    let data = buf.split(|a| *a == 0).next().unwrap_or(buf);

    String::from_utf8_lossy(data).trim_end().to_string()
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("shader source contains a NUL byte")]
    InvalidSource(#[from] NulError),
    #[error("{0}")]
    Compilation(String),
    #[error("{0}")]
    Linking(String),
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    pub fn uniform_location(&self, name: &str) -> Option<GLint> {
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) };

        (location >= 0).then_some(location)
    }

    /// Program has to be in use, see `GlRenderer::use_program`.
    pub fn set_mat4(&self, location: GLint, value: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_message_stops_at_nul() {
        let mut buf = [0_u8; 32];
        buf[..12].copy_from_slice(b"0:1: error\n\n");

        assert_eq!(log_message(&buf), "0:1: error");
        assert_eq!(log_message(b"no terminator"), "no terminator");
    }

    #[test]
    fn missing_source_file() {
        let res = ProgramBuilder::from_files("missing.vert.glsl", "missing.frag.glsl");

        match res {
            Err(PBError::Read { path, .. }) => assert_eq!(path, PathBuf::from("missing.vert.glsl")),
            _ => panic!("expected a read error"),
        }
    }

    #[test]
    fn nul_in_source_is_rejected_before_gl() {
        let res = ProgramBuilder::new("void main() {}\0", "void main() {}").build();

        assert!(matches!(res, Err(PBError::InvalidSource(_))));
    }
}
