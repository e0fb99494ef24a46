use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use sdl2::{keyboard::Keycode, video};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod error;
mod geometry;
mod gl_wrappers;
mod mesh;
mod render;
mod state;
mod textures;

use crate::{
    error::{ViewerError, ViewerResult},
    geometry::{Aabb, GpuGeometry, ViewTransform},
    gl_wrappers::gl_upd_viewport,
    mesh::obj::load_obj,
    render::Render,
    state::ViewState,
};

/// This determines all values related to framecapping!
///
/// Note: this is SOFT due to the fact that we may or may not sleep
/// less, since we do calculations to not over-sleep, which may not
/// be perfect because for some reason keeping time is difficult
const SOFT_FPS_CAP: u64 = 60;

const OPENGL_MAJOR_VER: u8 = 4;
const OPENGL_MINOR_VER: u8 = 2;

const MAX_MICROS_BETWEEN_FRAMES: u64 = 1_000_000 / SOFT_FPS_CAP;

const DURATION_BETWEEN_FRAMES: Duration = Duration::from_micros(MAX_MICROS_BETWEEN_FRAMES);

const WINDOW_WIDTH: u32 = 1000;
const WINDOW_HEIGHT: u32 = 1000;
const WINDOW_TITLE: &str = "meshview";

/// Mesh shown when no path is given on the command line.
const DEFAULT_MESH_PATH: &str = "assets/models/cube.obj";

fn main() {
    init_tracing();
    if let Err(err) = run() {
        error!("fatal: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run() -> ViewerResult<()> {
    let mesh_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MESH_PATH));

    let mut mesh = load_obj(&mesh_path)?;
    info!(
        "loaded `{}`: {} vertices, {} faces",
        mesh_path.display(),
        mesh.vertex_count(),
        mesh.face_count()
    );
    if !mesh.has_vertex_normals() {
        debug!("no usable file normals; computing from face geometry");
    }
    mesh.ensure_vertex_normals();

    let aabb = Aabb::from_points(&mesh.positions).ok_or_else(|| ViewerError::EmptyMesh {
        path: mesh_path.clone(),
    })?;
    let transform = ViewTransform::from_aabb(&aabb);
    info!(
        "view transform: scale {:.4}, center ({:.4}, {:.4}, {:.4})",
        transform.scale, transform.center.x, transform.center.y, transform.center.z
    );
    let geometry = GpuGeometry::extract(&mesh);

    let (sdl_ctx, video_ctx, window) = init_sdl().map_err(ViewerError::Window)?;
    let mut event_pump = sdl_ctx.event_pump().map_err(ViewerError::Window)?;

    let gl_ctx = window.gl_create_context().map_err(ViewerError::Window)?;
    gl::load_with(|s| video_ctx.gl_get_proc_address(s).cast());

    gl_upd_viewport(WINDOW_WIDTH, WINDOW_HEIGHT);

    let mut render_ctx = Render::init(&gl_ctx, &geometry, transform)?;
    let mut view_state = ViewState::default();

    let mut frametime_collector = Vec::with_capacity(SOFT_FPS_CAP as usize);
    let mut last_debug_check = Instant::now();

    'going: loop {
        let instant_loop_start = Instant::now();
        for event in event_pump.poll_iter() {
            use sdl2::event::Event as Ev;
            match event {
                Ev::Quit { .. }
                | Ev::KeyDown {
                    keycode: Some(Keycode::ESCAPE),
                    ..
                } => {
                    break 'going;
                }
                Ev::KeyDown {
                    keycode: Some(key), ..
                } => {
                    view_state.handle_key(key);
                }
                _ => {}
            }
        }

        render_ctx.draw(&view_state);
        window.gl_swap_window();

        // Soft cap fps
        thread::sleep(
            DURATION_BETWEEN_FRAMES
                .checked_sub(instant_loop_start.elapsed())
                .unwrap_or(Duration::ZERO),
        );
        let instant_after_sleep = Instant::now();

        let frametime = instant_after_sleep
            .duration_since(instant_loop_start)
            .as_secs_f64();
        frametime_collector.push(frametime);

        // If it's been over a second since
        // last debug print, print it
        if instant_after_sleep
            .duration_since(last_debug_check)
            .as_secs()
            >= 1
        {
            let total_time: f64 = frametime_collector.iter().sum();
            let avg_time = total_time / frametime_collector.len() as f64;
            debug!(
                "frametime: {avg_time:0.8}, FPS: {:0.8}, frames counted: {:05}",
                1. / avg_time,
                frametime_collector.len()
            );

            frametime_collector.clear();
            last_debug_check = Instant::now();
        }
    }
    Ok(())
}

fn init_sdl() -> Result<(sdl2::Sdl, sdl2::VideoSubsystem, video::Window), String> {
    let sdl_ctx = sdl2::init()?;

    let video_ctx = sdl_ctx.video()?;
    video_ctx.gl_load_library_default()?;

    video_ctx
        .gl_attr()
        .set_context_flags()
        .forward_compatible()
        .set();
    video_ctx
        .gl_attr()
        .set_context_major_version(OPENGL_MAJOR_VER);
    video_ctx
        .gl_attr()
        .set_context_minor_version(OPENGL_MINOR_VER);
    video_ctx
        .gl_attr()
        .set_context_profile(video::GLProfile::Core);

    let window = video_ctx
        .window(WINDOW_TITLE, WINDOW_WIDTH, WINDOW_HEIGHT)
        .position_centered()
        .opengl()
        .build()
        .map_err(|err| err.to_string())?;

    Ok((sdl_ctx, video_ctx, window))
}
