//! GPU-side state and the per-frame draw path.

use std::{ffi::CStr, ptr::null};

use gl::types as gltype;
use glam::{Mat4, Vec3, Vec4};
use sdl2::video::GLContext;

use crate::{
    error::ViewerResult,
    geometry::{GpuGeometry, ViewTransform},
    gl_wrappers::{program::Program, shader::Shader},
    state::ViewState,
    textures::StrokeTextures,
};

macro_rules! include_cstr {
    ( $path:literal $(,)? ) => {{
        // Use a constant to force the verification to run at compile time.
        const VALUE: &'static ::core::ffi::CStr = match ::core::ffi::CStr::from_bytes_with_nul(
            concat!(include_str!($path), "\0").as_bytes(),
        ) {
            Ok(value) => value,
            Err(_) => panic!(concat!("interior NUL byte(s) in `", $path, "`")),
        };
        VALUE
    }};
}

const VERT_SHADER_SOURCE: &CStr = include_cstr!("../glsl/vert_shader.glsl");
const GEOM_SHADER_SOURCE: &CStr = include_cstr!("../glsl/geom_shader.glsl");
const FRAG_SHADER_SOURCE: &CStr = include_cstr!("../glsl/frag_shader.glsl");

/// Fixed camera position in world space.
const EYE_POSITION: Vec3 = Vec3::new(0.0, 0.0, 4.0);
/// Light position in world space before the orbit rotation.
const LIGHT_WORLD: Vec4 = Vec4::new(5.0, 5.0, 10.0, 1.0);

const ASPECT: f32 = 1.0;
const NEAR_PLANE: f32 = 2.0;
const FAR_PLANE: f32 = 10.0;

/// Texture unit index pushed for each of the eight stroke samplers.
const SAMPLER_UNITS: [i32; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

static mut INITIALIZED_ALREADY: bool = false;

/// Owns the mesh buffers, the stylization program and the fixed camera.
pub struct Render {
    vao: gltype::GLuint,
    _buffers: [gltype::GLuint; 3],
    program: Program,
    strokes: StrokeTextures,
    uniforms: UniformLocations,
    view: Mat4,
    transform: ViewTransform,
    element_count: gltype::GLsizei,
}

/// Locations resolved once at link time.
struct UniformLocations {
    model_view: gltype::GLint,
    mvp: gltype::GLint,
    normal: gltype::GLint,
    light_pos: gltype::GLint,
    eye_pos: gltype::GLint,
    shading_mode: gltype::GLint,
    stroke_mode: gltype::GLint,
    crease_width: gltype::GLint,
    silhouette_width: gltype::GLint,
}

impl UniformLocations {
    fn resolve(program: &Program) -> ViewerResult<Self> {
        Ok(Self {
            model_view: program.required_uniform("mvMatrix")?,
            mvp: program.required_uniform("mvpMatrix")?,
            normal: program.required_uniform("norMatrix")?,
            light_pos: program.required_uniform("lightPos")?,
            eye_pos: program.required_uniform("eyePos")?,
            shading_mode: program.required_uniform("shadingMode")?,
            stroke_mode: program.required_uniform("strokeMode")?,
            crease_width: program.required_uniform("creaseWidth")?,
            silhouette_width: program.required_uniform("silhouetteWidth")?,
        })
    }
}

/// Matrices and vectors recomputed for every frame.
pub struct FrameMatrices {
    pub model_view: Mat4,
    pub mvp: Mat4,
    /// Inverse-transpose of the model-view, for normals.
    pub normal: Mat4,
    /// Orbited light position in eye space.
    pub light_eye: Vec4,
}

/// Build the per-frame transform set from the interactive state.
///
/// The model matrix recentres the mesh, applies the normalizing scale and
/// then the two interactive rotations, X outermost. The light orbits its
/// world position about the Y axis before entering eye space.
pub fn frame_matrices(state: &ViewState, transform: &ViewTransform, view: &Mat4) -> FrameMatrices {
    let model = Mat4::from_rotation_x(state.rotation_x.to_radians())
        * Mat4::from_rotation_y(state.rotation_y.to_radians())
        * Mat4::from_scale(Vec3::splat(transform.scale))
        * Mat4::from_translation(-transform.center);
    let model_view = *view * model;
    let projection =
        Mat4::perspective_rh_gl(state.zoom.to_radians(), ASPECT, NEAR_PLANE, FAR_PLANE);

    FrameMatrices {
        model_view,
        mvp: projection * model_view,
        normal: model_view.inverse().transpose(),
        light_eye: *view * Mat4::from_rotation_y(state.light_angle.to_radians()) * LIGHT_WORLD,
    }
}

fn view_matrix() -> Mat4 {
    Mat4::look_at_rh(EYE_POSITION, Vec3::ZERO, Vec3::Y)
}

impl Render {
    /// Upload `geometry`, build the stylization program and set the fixed
    /// GL state. Call once, after the context exists.
    pub fn init(
        gl_ctx: &GLContext,
        geometry: &GpuGeometry,
        transform: ViewTransform,
    ) -> ViewerResult<Self> {
        assert!(
            gl_ctx.is_current(),
            "gl_ctx must be current in order to create a Render"
        );
        // SAFETY: single-threaded startup; the flag keeps a second Render
        // from clobbering the global GL state the first one configured.
        unsafe {
            if INITIALIZED_ALREADY {
                panic!("Cannot initialize Render more than once");
            }
            INITIALIZED_ALREADY = true;
        }

        let element_count = geometry.elements.len().try_into().unwrap();
        // SAFETY: the context is current, checked above.
        let (vao, buffers) = unsafe { upload_geometry(geometry) };

        let vert_shader = Shader::vertex(VERT_SHADER_SOURCE).compile()?;
        let geom_shader = Shader::geometry(GEOM_SHADER_SOURCE).compile()?;
        let frag_shader = Shader::fragment(FRAG_SHADER_SOURCE).compile()?;
        let program = Program::new(&vert_shader, Some(&geom_shader), &frag_shader)?;
        let uniforms = UniformLocations::resolve(&program)?;

        program.bind();
        let stroke_maps = program.required_uniform("strokeMaps")?;
        program.set_i32_slice(stroke_maps, &SAMPLER_UNITS);
        let strokes = StrokeTextures::install();

        // SAFETY: plain state switches on the current context.
        unsafe {
            gl::ClearColor(1.0, 1.0, 1.0, 1.0);
            gl::Enable(gl::DEPTH_TEST);
            gl::PolygonMode(gl::FRONT_AND_BACK, gl::FILL);
        }

        Ok(Render {
            vao,
            _buffers: buffers,
            program,
            strokes,
            uniforms,
            view: view_matrix(),
            transform,
            element_count,
        })
    }

    /// Render one frame from the current interactive state.
    pub fn draw(&mut self, state: &ViewState) {
        let matrices = frame_matrices(state, &self.transform, &self.view);
        let eye_in_view = self.view.transform_point3(EYE_POSITION);

        self.program.bind();
        self.program
            .set_mat4(self.uniforms.model_view, &matrices.model_view);
        self.program.set_mat4(self.uniforms.mvp, &matrices.mvp);
        self.program.set_mat4(self.uniforms.normal, &matrices.normal);
        self.program
            .set_vec4(self.uniforms.light_pos, matrices.light_eye);
        self.program.set_vec3(self.uniforms.eye_pos, eye_in_view);
        self.program
            .set_i32(self.uniforms.shading_mode, state.shading.shader_value());
        self.program
            .set_i32(self.uniforms.stroke_mode, state.stroke.shader_value());
        self.program
            .set_f32(self.uniforms.crease_width, state.crease_thickness);
        self.program
            .set_f32(self.uniforms.silhouette_width, state.silhouette_thickness);
        self.strokes.bind();

        // SAFETY: the VAO and its buffers outlive every frame.
        unsafe {
            let mode = if state.wireframe { gl::LINE } else { gl::FILL };
            gl::PolygonMode(gl::FRONT_AND_BACK, mode);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
            gl::BindVertexArray(self.vao);
            gl::DrawElements(
                gl::TRIANGLES_ADJACENCY,
                self.element_count,
                gl::UNSIGNED_INT,
                null(),
            );
            gl::BindVertexArray(0);
        }
    }
}

/// Create the VAO and the three static buffers: positions on attribute 0,
/// normals on attribute 1, and the adjacency element list.
///
/// # Safety
/// Requires a current GL context.
unsafe fn upload_geometry(geometry: &GpuGeometry) -> (gltype::GLuint, [gltype::GLuint; 3]) {
    let mut vao = 0;
    gl::GenVertexArrays(1, &mut vao);
    gl::BindVertexArray(vao);

    let mut buffers = [0; 3];
    gl::GenBuffers(3, buffers.as_mut_ptr());

    gl::BindBuffer(gl::ARRAY_BUFFER, buffers[0]);
    gl::BufferData(
        gl::ARRAY_BUFFER,
        byte_len(&geometry.positions),
        geometry.positions.as_ptr().cast(),
        gl::STATIC_DRAW,
    );
    gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, 0, null());
    gl::EnableVertexAttribArray(0);

    gl::BindBuffer(gl::ARRAY_BUFFER, buffers[1]);
    gl::BufferData(
        gl::ARRAY_BUFFER,
        byte_len(&geometry.normals),
        geometry.normals.as_ptr().cast(),
        gl::STATIC_DRAW,
    );
    gl::VertexAttribPointer(1, 3, gl::FLOAT, gl::FALSE, 0, null());
    gl::EnableVertexAttribArray(1);

    gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, buffers[2]);
    gl::BufferData(
        gl::ELEMENT_ARRAY_BUFFER,
        byte_len(&geometry.elements),
        geometry.elements.as_ptr().cast(),
        gl::STATIC_DRAW,
    );

    // The VAO records the element binding; unbind it first.
    gl::BindVertexArray(0);
    gl::BindBuffer(gl::ARRAY_BUFFER, 0);

    (vao, buffers)
}

fn byte_len<T>(slice: &[T]) -> gltype::GLsizeiptr {
    (slice.len() * std::mem::size_of::<T>()).try_into().unwrap()
}
