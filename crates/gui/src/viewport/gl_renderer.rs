use std::collections::HashMap;
use std::sync::Arc;

use glam::Mat4;
use glow::HasContext;
use thiserror::Error;

use scene_demos_lib::assets::AlphaMap;
use scene_demos_lib::scene::{light_color, Instance, Lighting, MAX_POINT_LIGHTS};

use super::camera::ArcBallCamera;
use super::mesh::{MeshData, Shape};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("GL allocation failed: {0}")]
    Alloc(String),
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: &'static str, log: String },
    #[error("program link failed: {0}")]
    Link(String),
}

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering the viewport
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [f32; 4],
    /// Background color RGB
    pub bg_color: [u8; 3],
}

impl RenderParams {
    fn aspect(&self) -> f32 {
        self.viewport[2] / self.viewport[3].max(1.0)
    }
}

/// The aim trainer target for one frame
pub struct TargetDraw {
    /// Local geometry; uploaded again only when `key` changes
    pub mesh: MeshData,
    pub key: (u32, u32),
    pub model: Mat4,
    pub color: [f32; 3],
}

/// Which demo a point buffer belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointSet {
    Particles,
    Stars,
    Ghosts,
}

/// A cloud of point sprites for one frame
pub struct PointDraw {
    pub set: PointSet,
    pub positions: Arc<Vec<f32>>,
    pub colors: Arc<Vec<f32>>,
    /// Colors and point count are uploaded again when this changes
    pub version: u64,
    pub size: f32,
    pub sprite: Arc<AlphaMap>,
    /// Identifies `sprite`; the texture is uploaded again when it changes
    pub sprite_key: u8,
}

/// Lit primitives plus an optional point cloud
pub struct SceneDraw {
    pub instances: Vec<Instance>,
    pub lighting: Lighting,
    pub points: Option<PointDraw>,
}

// ── GPU handles ──────────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

struct GpuPoints {
    vao: glow::VertexArray,
    positions: glow::Buffer,
    colors: glow::Buffer,
    count: i32,
    key: (PointSet, u64),
}

struct GpuSprite {
    texture: glow::Texture,
    key: u8,
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    mesh_program: glow::Program,
    lit_program: glow::Program,
    point_program: glow::Program,
    target: Option<((u32, u32), GpuMesh)>,
    shapes: HashMap<Shape, GpuMesh>,
    points: Option<GpuPoints>,
    sprite: Option<GpuSprite>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Result<Self, RenderError> {
        let mut programs = Vec::with_capacity(3);
        for (vert, frag) in [(MESH_VERT, MESH_FRAG), (LIT_VERT, LIT_FRAG), (POINT_VERT, POINT_FRAG)] {
            match compile_program(gl, vert, frag) {
                Ok(p) => programs.push(p),
                Err(e) => {
                    for p in programs {
                        unsafe { gl.delete_program(p) };
                    }
                    return Err(e);
                }
            }
        }
        let [mesh_program, lit_program, point_program] = [programs[0], programs[1], programs[2]];

        Ok(Self {
            mesh_program,
            lit_program,
            point_program,
            target: None,
            shapes: HashMap::new(),
            points: None,
            sprite: None,
        })
    }

    /// Upload the target disc if its shape changed
    pub fn sync_target(&mut self, gl: &glow::Context, draw: &TargetDraw) -> Result<(), RenderError> {
        if self.target.as_ref().is_some_and(|(key, _)| *key == draw.key) {
            return Ok(());
        }
        if let Some((_, old)) = self.target.take() {
            delete_mesh(gl, &old);
        }
        self.target = Some((draw.key, upload_mesh(gl, &draw.mesh)?));
        Ok(())
    }

    /// Re-create buffers when the set or version changes, otherwise stream
    /// the positions. Also keeps the sprite texture current.
    pub fn sync_points(&mut self, gl: &glow::Context, draw: &PointDraw) -> Result<(), RenderError> {
        let key = (draw.set, draw.version);
        match self.points.as_ref() {
            Some(points) if points.key == key => unsafe {
                gl.bind_buffer(glow::ARRAY_BUFFER, Some(points.positions));
                gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, cast_slice(&draw.positions));
                gl.bind_buffer(glow::ARRAY_BUFFER, None);
            },
            _ => {
                if let Some(old) = self.points.take() {
                    delete_points(gl, &old);
                }
                self.points = Some(upload_points(gl, draw)?);
                tracing::debug!(
                    "Uploaded {} points for {:?} (v{})",
                    draw.positions.len() / 3,
                    draw.set,
                    draw.version
                );
            }
        }

        if self.sprite.as_ref().is_some_and(|s| s.key == draw.sprite_key) {
            return Ok(());
        }
        if let Some(old) = self.sprite.take() {
            unsafe { gl.delete_texture(old.texture) };
        }
        self.sprite = Some(upload_sprite(gl, &draw.sprite, draw.sprite_key)?);
        Ok(())
    }

    /// Upload every shape the scene uses that is not on the GPU yet
    pub fn sync_scene(&mut self, gl: &glow::Context, draw: &SceneDraw) -> Result<(), RenderError> {
        for inst in &draw.instances {
            if !self.shapes.contains_key(&inst.shape) {
                let mesh = upload_mesh(gl, &inst.shape.build())?;
                self.shapes.insert(inst.shape, mesh);
                tracing::debug!("Uploaded {:?} mesh", inst.shape);
            }
        }
        if let Some(points) = &draw.points {
            self.sync_points(gl, points)?;
        }
        Ok(())
    }

    /// Render the target disc
    pub fn paint_target(
        &self,
        gl: &glow::Context,
        camera: &ArcBallCamera,
        params: &RenderParams,
        draw: &TargetDraw,
    ) {
        let mvp = camera.view_projection(params.aspect()) * draw.model;

        unsafe {
            begin_frame(gl, params);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);

            if let Some((_, ref target)) = self.target {
                gl.use_program(Some(self.mesh_program));
                set_uniform_mat4(gl, self.mesh_program, "u_mvp", &mvp);
                set_uniform_vec3(gl, self.mesh_program, "u_color", draw.color);
                draw_mesh(gl, target);
            }

            gl.disable(glow::DEPTH_TEST);
            end_frame(gl);
        }
    }

    /// Render the particle cloud alone
    pub fn paint_particles(
        &self,
        gl: &glow::Context,
        camera: &ArcBallCamera,
        params: &RenderParams,
        size: f32,
    ) {
        unsafe {
            begin_frame(gl, params);
            self.draw_points(gl, camera, params, size);
            end_frame(gl);
        }
    }

    /// Render lit primitives, then the scene's points on top
    pub fn paint_scene(
        &self,
        gl: &glow::Context,
        camera: &ArcBallCamera,
        params: &RenderParams,
        draw: &SceneDraw,
    ) {
        let view_proj = camera.view_projection(params.aspect());
        let program = self.lit_program;
        let lighting = &draw.lighting;

        unsafe {
            begin_frame(gl, params);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);
            gl.use_program(Some(program));

            set_uniform_vec3(gl, program, "u_ambient", lighting.ambient);
            set_uniform_vec3(gl, program, "u_sun_dir", lighting.sun_direction.normalize_or_zero().to_array());
            set_uniform_vec3(gl, program, "u_sun_color", lighting.sun_color);
            set_uniform_f32(gl, program, "u_bands", lighting.toon_bands as f32);
            set_uniform_vec3(gl, program, "u_eye", camera.eye_position().to_array());

            let lights = &lighting.point_lights[..lighting.point_lights.len().min(MAX_POINT_LIGHTS)];
            let loc = gl.get_uniform_location(program, "u_light_count");
            gl.uniform_1_i32(loc.as_ref(), lights.len() as i32);
            for (i, light) in lights.iter().enumerate() {
                set_uniform_vec3(gl, program, &format!("u_light_pos[{i}]"), light.position.to_array());
                set_uniform_vec3(gl, program, &format!("u_light_color[{i}]"), light_color(light.color, light.intensity));
                set_uniform_f32(gl, program, &format!("u_light_range[{i}]"), light.range);
            }

            match lighting.fog {
                Some(fog) => {
                    set_uniform_vec3(gl, program, "u_fog_color", fog.color.to_f32());
                    set_uniform_f32(gl, program, "u_fog_near", fog.near);
                    set_uniform_f32(gl, program, "u_fog_far", fog.far);
                }
                None => {
                    set_uniform_f32(gl, program, "u_fog_near", 0.0);
                    set_uniform_f32(gl, program, "u_fog_far", 0.0);
                }
            }

            for inst in &draw.instances {
                let Some(mesh) = self.shapes.get(&inst.shape) else {
                    continue;
                };
                set_uniform_mat4(gl, program, "u_mvp", &(view_proj * inst.model));
                set_uniform_mat4(gl, program, "u_model", &inst.model);
                set_uniform_vec3(gl, program, "u_color", inst.color.to_f32());
                draw_mesh(gl, mesh);
            }

            gl.disable(glow::DEPTH_TEST);

            if let Some(points) = &draw.points {
                // Depth kept from the meshes so shapes hide the points behind them
                gl.enable(glow::DEPTH_TEST);
                self.draw_points(gl, camera, params, points.size);
                gl.disable(glow::DEPTH_TEST);
            }

            end_frame(gl);
        }
    }

    /// Additive point sprites; expects `begin_frame` to have run
    unsafe fn draw_points(&self, gl: &glow::Context, camera: &ArcBallCamera, params: &RenderParams, size: f32) {
        let (Some(points), Some(sprite)) = (self.points.as_ref(), self.sprite.as_ref()) else {
            return;
        };

        gl.enable(glow::PROGRAM_POINT_SIZE);
        gl.enable(glow::BLEND);
        gl.blend_func(glow::SRC_ALPHA, glow::ONE);
        gl.depth_mask(false);

        gl.use_program(Some(self.point_program));
        set_uniform_mat4(gl, self.point_program, "u_view", &camera.view_matrix());
        set_uniform_mat4(
            gl,
            self.point_program,
            "u_proj",
            &camera.projection_matrix(params.aspect()),
        );
        set_uniform_f32(gl, self.point_program, "u_size", size);
        set_uniform_f32(gl, self.point_program, "u_scale", params.viewport[3] * 0.5);

        gl.active_texture(glow::TEXTURE0);
        gl.bind_texture(glow::TEXTURE_2D, Some(sprite.texture));
        let loc = gl.get_uniform_location(self.point_program, "u_alpha");
        gl.uniform_1_i32(loc.as_ref(), 0);

        gl.bind_vertex_array(Some(points.vao));
        gl.draw_arrays(glow::POINTS, 0, points.count);
        gl.bind_vertex_array(None);
        gl.bind_texture(glow::TEXTURE_2D, None);

        gl.depth_mask(true);
        gl.disable(glow::BLEND);
        gl.disable(glow::PROGRAM_POINT_SIZE);
    }

    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.mesh_program);
            gl.delete_program(self.lit_program);
            gl.delete_program(self.point_program);
            if let Some(ref sprite) = self.sprite {
                gl.delete_texture(sprite.texture);
            }
        }
        if let Some((_, ref target)) = self.target {
            delete_mesh(gl, target);
        }
        for mesh in self.shapes.values() {
            delete_mesh(gl, mesh);
        }
        if let Some(ref points) = self.points {
            delete_points(gl, points);
        }
    }
}

// ── Frame setup ──────────────────────────────────────────────

unsafe fn begin_frame(gl: &glow::Context, params: &RenderParams) {
    let [x, y, w, h] = params.viewport.map(|v| v as i32);
    gl.viewport(x, y, w, h);
    gl.scissor(x, y, w, h);
    gl.enable(glow::SCISSOR_TEST);

    gl.clear_color(
        params.bg_color[0] as f32 / 255.0,
        params.bg_color[1] as f32 / 255.0,
        params.bg_color[2] as f32 / 255.0,
        1.0,
    );
    gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
}

unsafe fn end_frame(gl: &glow::Context) {
    gl.disable(glow::SCISSOR_TEST);
    gl.use_program(None);
}

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Result<GpuMesh, RenderError> {
    unsafe {
        let vao = gl.create_vertex_array().map_err(RenderError::Alloc)?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer().map_err(RenderError::Alloc)?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, cast_slice(&data.vertices), glow::STATIC_DRAW);

        // position + normal; the fill color comes from a uniform
        let stride = (MeshData::STRIDE * 4) as i32;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 12);

        let ibo = gl.create_buffer().map_err(RenderError::Alloc)?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

fn upload_points(gl: &glow::Context, draw: &PointDraw) -> Result<GpuPoints, RenderError> {
    unsafe {
        let vao = gl.create_vertex_array().map_err(RenderError::Alloc)?;
        gl.bind_vertex_array(Some(vao));

        let positions = gl.create_buffer().map_err(RenderError::Alloc)?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(positions));
        gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, cast_slice(&draw.positions), glow::DYNAMIC_DRAW);
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, 12, 0);

        let colors = gl.create_buffer().map_err(RenderError::Alloc)?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(colors));
        gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, cast_slice(&draw.colors), glow::STATIC_DRAW);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, 12, 0);

        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);

        Ok(GpuPoints {
            vao,
            positions,
            colors,
            count: (draw.positions.len() / 3) as i32,
            key: (draw.set, draw.version),
        })
    }
}

fn upload_sprite(gl: &glow::Context, sprite: &AlphaMap, key: u8) -> Result<GpuSprite, RenderError> {
    unsafe {
        let texture = gl.create_texture().map_err(RenderError::Alloc)?;
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::R8 as i32,
            sprite.width as i32,
            sprite.height as i32,
            0,
            glow::RED,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(&sprite.texels)),
        );
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
        gl.bind_texture(glow::TEXTURE_2D, None);

        Ok(GpuSprite { texture, key })
    }
}

fn delete_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    unsafe {
        gl.delete_vertex_array(mesh.vao);
        gl.delete_buffer(mesh.vbo);
        gl.delete_buffer(mesh.ibo);
    }
}

fn delete_points(gl: &glow::Context, points: &GpuPoints) {
    unsafe {
        gl.delete_vertex_array(points.vao);
        gl.delete_buffer(points.positions);
        gl.delete_buffer(points.colors);
    }
}

// ── Shader compilation ───────────────────────────────────────

fn compile_shader(
    gl: &glow::Context,
    kind: u32,
    stage: &'static str,
    src: &str,
) -> Result<glow::Shader, RenderError> {
    unsafe {
        let shader = gl.create_shader(kind).map_err(RenderError::Alloc)?;
        gl.shader_source(shader, src);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(RenderError::Compile { stage, log });
        }
        Ok(shader)
    }
}

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<glow::Program, RenderError> {
    let vert = compile_shader(gl, glow::VERTEX_SHADER, "vertex", vert_src)?;
    let frag = match compile_shader(gl, glow::FRAGMENT_SHADER, "fragment", frag_src) {
        Ok(f) => f,
        Err(e) => {
            unsafe { gl.delete_shader(vert) };
            return Err(e);
        }
    };

    unsafe {
        let program = gl.create_program().map_err(RenderError::Alloc)?;
        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(RenderError::Link(log));
        }
        Ok(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: [f32; 3]) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v[0], v[1], v[2]);
    }
}

fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, v: f32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(loc.as_ref(), v);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(slice.as_ptr() as *const u8, std::mem::size_of_val(slice)) }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
}
"#;

const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_color;

out vec4 frag_color;

void main() {
    frag_color = vec4(u_color, 1.0);
}
"#;

const LIT_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;
uniform mat4 u_model;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;

out vec3 v_world;
out vec3 v_normal;

void main() {
    v_world = (u_model * vec4(a_position, 1.0)).xyz;
    v_normal = mat3(transpose(inverse(u_model))) * a_normal;
    gl_Position = u_mvp * vec4(a_position, 1.0);
}
"#;

const LIT_FRAG: &str = r#"#version 330 core
#define MAX_LIGHTS 4

uniform vec3 u_color;
uniform vec3 u_ambient;
uniform vec3 u_sun_dir;
uniform vec3 u_sun_color;
uniform float u_bands;
uniform vec3 u_eye;

uniform int u_light_count;
uniform vec3 u_light_pos[MAX_LIGHTS];
uniform vec3 u_light_color[MAX_LIGHTS];
uniform float u_light_range[MAX_LIGHTS];

uniform vec3 u_fog_color;
uniform float u_fog_near;
uniform float u_fog_far;

in vec3 v_world;
in vec3 v_normal;
out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    float diffuse = max(dot(n, u_sun_dir), 0.0);
    if (u_bands > 1.0) {
        diffuse = min(floor(diffuse * u_bands) / (u_bands - 1.0), 1.0);
    }
    vec3 light = u_ambient + u_sun_color * diffuse;

    for (int i = 0; i < u_light_count; ++i) {
        vec3 to_light = u_light_pos[i] - v_world;
        float dist = length(to_light);
        float falloff = clamp(1.0 - dist / u_light_range[i], 0.0, 1.0);
        float lambert = max(dot(n, to_light / max(dist, 1e-4)), 0.0);
        light += u_light_color[i] * lambert * falloff * falloff;
    }

    vec3 color = u_color * light;
    if (u_fog_far > u_fog_near) {
        float f = clamp((length(v_world - u_eye) - u_fog_near) / (u_fog_far - u_fog_near), 0.0, 1.0);
        color = mix(color, u_fog_color, f);
    }
    frag_color = vec4(color, 1.0);
}
"#;

const POINT_VERT: &str = r#"#version 330 core
uniform mat4 u_view;
uniform mat4 u_proj;
uniform float u_size;
uniform float u_scale;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_color;

out vec3 v_color;

void main() {
    vec4 view_pos = u_view * vec4(a_position, 1.0);
    gl_Position = u_proj * view_pos;
    gl_PointSize = u_size * (u_scale / -view_pos.z);
    v_color = a_color;
}
"#;

const POINT_FRAG: &str = r#"#version 330 core
uniform sampler2D u_alpha;

in vec3 v_color;
out vec4 frag_color;

void main() {
    float a = texture(u_alpha, gl_PointCoord).r;
    if (a < 0.001) discard;
    frag_color = vec4(v_color, a);
}
"#;
