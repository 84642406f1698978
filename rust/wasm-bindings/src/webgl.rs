// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WebGL2 renderer with per-pixel Phong shading

use floorplan3d_scene::{Frame, Renderer, Solid};
use wasm_bindgen::prelude::*;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;

uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_position;
out vec3 v_normal;

void main() {
    v_position = a_position;
    v_normal = a_normal;
    gl_Position = u_projection * u_view * vec4(a_position, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_position;
in vec3 v_normal;

uniform vec3 u_color;
uniform vec3 u_ambient;
uniform vec3 u_light_position;
uniform vec3 u_light_radiance;
uniform vec3 u_camera_position;
uniform float u_shininess;
uniform vec3 u_specular;

out vec4 out_color;

void main() {
    vec3 n = normalize(v_normal);
    vec3 l = normalize(u_light_position - v_position);
    vec3 v = normalize(u_camera_position - v_position);
    vec3 h = normalize(l + v);

    float diffuse = max(dot(n, l), 0.0);
    float specular = diffuse > 0.0 ? pow(max(dot(n, h), 0.0), u_shininess) : 0.0;

    vec3 color = u_color * (u_ambient + u_light_radiance * diffuse)
        + u_specular * u_light_radiance * specular;
    out_color = vec4(color, 1.0);
}
"#;

/// Uploaded buffers of one solid
struct GpuSolid {
    vao: WebGlVertexArrayObject,
    index_count: i32,
    color: [f32; 3],
}

struct Uniforms {
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    light_position: Option<WebGlUniformLocation>,
    light_radiance: Option<WebGlUniformLocation>,
    camera_position: Option<WebGlUniformLocation>,
    shininess: Option<WebGlUniformLocation>,
    specular: Option<WebGlUniformLocation>,
}

/// Draws the scene group into a canvas
///
/// The group only ever grows, so solids are uploaded once, the first frame
/// they appear in.
pub struct WebGlRenderer {
    gl: Gl,
    canvas: HtmlCanvasElement,
    program: WebGlProgram,
    uniforms: Uniforms,
    solids: Vec<GpuSolid>,
    /// Ambient term added to every material
    pub ambient: [f32; 3],
    pub shininess: f32,
    pub specular: [f32; 3],
}

impl WebGlRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let gl: Gl = canvas
            .get_context("webgl2")?
            .ok_or_else(|| JsValue::from_str("WebGL2 not supported"))?
            .dyn_into()?;

        let vertex = compile_shader(&gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
        let fragment = compile_shader(&gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vertex, &fragment)?;

        let uniform = |name: &str| gl.get_uniform_location(&program, name);
        let uniforms = Uniforms {
            view: uniform("u_view"),
            projection: uniform("u_projection"),
            color: uniform("u_color"),
            ambient: uniform("u_ambient"),
            light_position: uniform("u_light_position"),
            light_radiance: uniform("u_light_radiance"),
            camera_position: uniform("u_camera_position"),
            shininess: uniform("u_shininess"),
            specular: uniform("u_specular"),
        };

        gl.enable(Gl::DEPTH_TEST);

        Ok(Self {
            gl,
            canvas,
            program,
            uniforms,
            solids: Vec::new(),
            ambient: [0.0; 3],
            // Phong material defaults
            shininess: 30.0,
            specular: [0x11 as f32 / 255.0; 3],
        })
    }

    /// Solids uploaded so far
    pub fn uploaded(&self) -> usize {
        self.solids.len()
    }

    fn upload(&self, solid: &Solid) -> Result<GpuSolid, JsValue> {
        let gl = &self.gl;
        let mesh = solid.world_mesh();

        let interleaved: Vec<f32> = mesh
            .positions
            .chunks_exact(3)
            .zip(mesh.normals.chunks_exact(3))
            .flat_map(|(p, n)| [p[0], p[1], p[2], n[0], n[1], n[2]])
            .collect();

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| JsValue::from_str("Failed to create vertex array"))?;
        gl.bind_vertex_array(Some(&vao));

        let vertex_buffer = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("Failed to create vertex buffer"))?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vertex_buffer));
        let vertices = js_sys::Float32Array::from(&interleaved[..]);
        gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &vertices, Gl::STATIC_DRAW);

        let stride = 6 * 4;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, Gl::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(1, 3, Gl::FLOAT, false, stride, 3 * 4);

        let index_buffer = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("Failed to create index buffer"))?;
        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
        let indices = js_sys::Uint32Array::from(&mesh.indices[..]);
        gl.buffer_data_with_array_buffer_view(Gl::ELEMENT_ARRAY_BUFFER, &indices, Gl::STATIC_DRAW);

        gl.bind_vertex_array(None);

        Ok(GpuSolid {
            vao,
            index_count: mesh.indices.len() as i32,
            color: solid.color.to_rgb_f32(),
        })
    }
}

impl Renderer for WebGlRenderer {
    type Error = JsValue;

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    fn render(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error> {
        for solid in &frame.scene.solids()[self.solids.len()..] {
            let uploaded = self.upload(solid)?;
            self.solids.push(uploaded);
        }

        let gl = &self.gl;
        let [r, g, b] = frame.background.to_rgb_f32();
        gl.clear_color(r, g, b, 1.0);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        gl.use_program(Some(&self.program));
        let u = &self.uniforms;
        gl.uniform_matrix4fv_with_f32_array(u.view.as_ref(), false, frame.view.as_slice());
        gl.uniform_matrix4fv_with_f32_array(u.projection.as_ref(), false, frame.projection.as_slice());
        gl.uniform3fv_with_f32_array(u.ambient.as_ref(), &self.ambient);
        gl.uniform3fv_with_f32_array(u.specular.as_ref(), &self.specular);
        gl.uniform1f(u.shininess.as_ref(), self.shininess);

        let light = frame.light.position.cast::<f32>();
        gl.uniform3f(u.light_position.as_ref(), light.x, light.y, light.z);
        gl.uniform3fv_with_f32_array(u.light_radiance.as_ref(), &frame.light.radiance());
        let eye = frame.camera_position;
        gl.uniform3f(u.camera_position.as_ref(), eye.x, eye.y, eye.z);

        for solid in &self.solids {
            gl.uniform3fv_with_f32_array(u.color.as_ref(), &solid.color);
            gl.bind_vertex_array(Some(&solid.vao));
            gl.draw_elements_with_i32(Gl::TRIANGLES, solid.index_count, Gl::UNSIGNED_INT, 0);
        }
        gl.bind_vertex_array(None);

        Ok(())
    }
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| JsValue::from_str("Unable to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        Err(JsValue::from_str(&format!("Shader compile failed: {}", log)))
    }
}

fn link_program(gl: &Gl, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram, JsValue> {
    let program = gl
        .create_program()
        .ok_or_else(|| JsValue::from_str("Unable to create program"))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        Err(JsValue::from_str(&format!("Program link failed: {}", log)))
    }
}
