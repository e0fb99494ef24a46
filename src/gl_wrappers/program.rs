//! Exports [`Program`].
use std::ffi::CString;

use glam::{Mat4, Vec3, Vec4};

use super::shader::{read_info_log, CompiledShader};
use crate::error::{ViewerError, ViewerResult};

/// Wrapper for an OpenGL program.
///
/// <https://www.khronos.org/opengl/wiki/GLSL_Object#Program_objects>
pub struct Program {
    /// The internal OpenGL id for this object.
    id: gl::types::GLuint,
}

impl Program {
    /// Link a program from compiled stages.
    pub fn new(
        vert_shader: &CompiledShader,
        geo_shader: Option<&CompiledShader>,
        frag_shader: &CompiledShader,
    ) -> ViewerResult<Self> {
        let inner = unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vert_shader.id());
            gl::AttachShader(program, frag_shader.id());
            if let Some(shader) = geo_shader {
                gl::AttachShader(program, shader.id());
            }
            gl::LinkProgram(program);
            let mut success = 0;
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
            if success != gl::TRUE.into() {
                return Err(ViewerError::ProgramLink(read_info_log(
                    program,
                    gl::GetProgramInfoLog,
                )));
            }
            program
        };

        Ok(Self { id: inner })
    }

    /// Make this program current.
    pub fn bind(&self) {
        // SAFETY: the id refers to a successfully linked program.
        unsafe { gl::UseProgram(self.id) }
    }

    /// Get the location of a uniform in this program.
    ///
    /// # Panics
    /// This function panics if `name` contains interior nuls.
    pub fn get_uniform_location(&self, name: impl AsRef<str>) -> Option<gl::types::GLint> {
        let name = CString::new(name.as_ref()).unwrap();
        unsafe {
            let uniform_location = gl::GetUniformLocation(self.id, name.as_ptr().cast());
            if uniform_location < 0 {
                None
            } else {
                Some(uniform_location)
            }
        }
    }

    /// Like [`Program::get_uniform_location`], but failing loudly.
    ///
    /// The linker strips uniforms that contribute nothing to the pipeline, so
    /// an absent name here means the shaders and the calling code disagree.
    pub fn required_uniform(&self, name: &str) -> ViewerResult<gl::types::GLint> {
        self.get_uniform_location(name)
            .ok_or_else(|| ViewerError::UniformNotFound(name.to_owned()))
    }

    /// Upload a matrix uniform. The program must be current.
    pub fn set_mat4(&self, location: gl::types::GLint, value: &Mat4) {
        let columns = value.to_cols_array();
        // SAFETY: the array holds the 16 floats UniformMatrix4fv reads.
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, columns.as_ptr()) }
    }

    /// Upload a vec3 uniform. The program must be current.
    pub fn set_vec3(&self, location: gl::types::GLint, value: Vec3) {
        unsafe { gl::Uniform3f(location, value.x, value.y, value.z) }
    }

    /// Upload a vec4 uniform. The program must be current.
    pub fn set_vec4(&self, location: gl::types::GLint, value: Vec4) {
        unsafe { gl::Uniform4f(location, value.x, value.y, value.z, value.w) }
    }

    /// Upload an int uniform. The program must be current.
    pub fn set_i32(&self, location: gl::types::GLint, value: i32) {
        unsafe { gl::Uniform1i(location, value) }
    }

    /// Upload a float uniform. The program must be current.
    pub fn set_f32(&self, location: gl::types::GLint, value: f32) {
        unsafe { gl::Uniform1f(location, value) }
    }

    /// Upload an int array uniform. The program must be current.
    pub fn set_i32_slice(&self, location: gl::types::GLint, values: &[i32]) {
        // SAFETY: the slice length bounds the element count.
        unsafe {
            gl::Uniform1iv(
                location,
                values.len() as gl::types::GLsizei,
                values.as_ptr(),
            )
        }
    }
}
