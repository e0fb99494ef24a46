//! Shader object wrappers.

use std::{ffi::CString, ptr::null};

use crate::error::{ViewerError, ViewerResult};

const INFO_LOG_CAPACITY: usize = 512;

/// Shader source wrapped with the GL object that will compile it.
pub struct Shader {
    inner: gl::types::GLuint,
    source: CString,
    stage: ShaderType,
    was_compiled: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum ShaderType {
    Fragment,
    Geometry,
    Vertex,
}

impl ShaderType {
    /// Stage name as it appears in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fragment => "fragment",
            Self::Geometry => "geometry",
            Self::Vertex => "vertex",
        }
    }
}

impl Shader {
    /// Wrap shader source code into a type-safe Rust struct.
    pub fn new<T: Into<CString>>(shader_type: ShaderType, source: T) -> Self {
        let shader = unsafe {
            match shader_type {
                ShaderType::Fragment => gl::CreateShader(gl::FRAGMENT_SHADER),
                ShaderType::Geometry => gl::CreateShader(gl::GEOMETRY_SHADER),
                ShaderType::Vertex => gl::CreateShader(gl::VERTEX_SHADER),
            }
        };
        Self {
            inner: shader,
            source: source.into(),
            stage: shader_type,
            was_compiled: false,
        }
    }
    /// Helper function for `Shader::new()` with vertex shaders.
    pub fn vertex<T: Into<CString>>(source: T) -> Self {
        Self::new(ShaderType::Vertex, source)
    }
    /// Helper function for `Shader::new()` with fragment shaders.
    pub fn fragment<T: Into<CString>>(source: T) -> Self {
        Self::new(ShaderType::Fragment, source)
    }
    /// Helper function for `Shader::new()` with geo shaders.
    pub fn geometry<T: Into<CString>>(source: T) -> Self {
        Self::new(ShaderType::Geometry, source)
    }

    pub fn compile(mut self) -> ViewerResult<CompiledShader> {
        let compiled_shader = unsafe {
            gl::ShaderSource(self.inner, 1, &self.source.as_ptr(), null());
            gl::CompileShader(self.inner);

            let mut success = 0;
            gl::GetShaderiv(self.inner, gl::COMPILE_STATUS, &mut success);

            if success != gl::TRUE.into() {
                return Err(ViewerError::ShaderCompile {
                    stage: self.stage.name(),
                    log: read_info_log(self.inner, gl::GetShaderInfoLog),
                });
            }
            self.was_compiled = true;
            self.inner
        };
        // SAFETY: COMPILE_STATUS was checked above.
        unsafe { Ok(CompiledShader::from_uint_unchecked(compiled_shader)) }
    }
}

/// Read and decode an info log via `GetShaderInfoLog`/`GetProgramInfoLog`.
pub(super) fn read_info_log(
    object: gl::types::GLuint,
    getter: unsafe fn(
        gl::types::GLuint,
        gl::types::GLsizei,
        *mut gl::types::GLsizei,
        *mut gl::types::GLchar,
    ),
) -> String {
    let mut infolog: Vec<u8> = vec![0; INFO_LOG_CAPACITY];
    let mut length = 0;
    // SAFETY: the buffer matches the advertised capacity.
    unsafe {
        getter(
            object,
            INFO_LOG_CAPACITY as gl::types::GLsizei,
            &mut length,
            infolog.as_mut_ptr().cast(),
        );
    }
    infolog.truncate(length.max(0) as usize);
    String::from_utf8_lossy(&infolog).into_owned()
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            if !self.was_compiled {
                gl::DeleteShader(self.inner);
            }
        }
    }
}
impl Drop for CompiledShader {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteShader(self.id);
        };
    }
}

pub struct CompiledShader {
    id: gl::types::GLuint,
}

impl CompiledShader {
    /// # Safety
    /// The uint passed into this function MUST be a uint returned by `gl::CompileShader`.
    pub unsafe fn from_uint_unchecked(shader: gl::types::GLuint) -> Self {
        Self { id: shader }
    }
    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }
}
