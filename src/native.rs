//! The OpenGL entry points the device forwards to.
use glow::HasContext;
use glutin::PossiblyCurrent;
use std::{
    mem,
    os::raw::{c_char, c_void},
};

/// Native OpenGL calls used by [`Device`](crate::device::Device).
///
/// Names are raw 32-bit OpenGL names. Every call must be made on the
/// thread holding the current context.
pub trait Native {
    unsafe fn get_error(&self) -> u32;
    unsafe fn get_parameter_string(&self, parameter: u32) -> String;
    /// Value of `GL_COLOR_CLEAR_VALUE`.
    unsafe fn get_clear_color(&self) -> [f32; 4];

    // Vertex arrays
    unsafe fn create_vertex_array(&self) -> Result<u32, String>;
    unsafe fn bind_vertex_array(&self, vertex_array: Option<u32>);
    unsafe fn delete_vertex_array(&self, vertex_array: u32);

    // Buffers
    unsafe fn create_buffer(&self) -> Result<u32, String>;
    unsafe fn bind_buffer(&self, target: u32, buffer: Option<u32>);
    unsafe fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32);
    unsafe fn buffer_data_size(&self, target: u32, size: i32, usage: u32);
    unsafe fn delete_buffer(&self, buffer: u32);

    // Textures
    unsafe fn create_texture(&self) -> Result<u32, String>;
    unsafe fn active_texture(&self, unit: u32);
    unsafe fn bind_texture(&self, target: u32, texture: Option<u32>);
    #[allow(clippy::too_many_arguments)]
    unsafe fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        border: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    );
    unsafe fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);
    unsafe fn delete_texture(&self, texture: u32);

    // Shaders and programs
    unsafe fn create_shader(&self, shader_type: u32) -> Result<u32, String>;
    unsafe fn shader_source(&self, shader: u32, source: &str);
    unsafe fn compile_shader(&self, shader: u32);
    unsafe fn get_shader_compile_status(&self, shader: u32) -> bool;
    unsafe fn get_shader_info_log(&self, shader: u32) -> String;
    unsafe fn delete_shader(&self, shader: u32);
    unsafe fn create_program(&self) -> Result<u32, String>;
    unsafe fn attach_shader(&self, program: u32, shader: u32);
    unsafe fn link_program(&self, program: u32);
    unsafe fn get_program_link_status(&self, program: u32) -> bool;
    unsafe fn get_program_info_log(&self, program: u32) -> String;
    /// At most `max_count` shaders attached to `program`.
    unsafe fn get_attached_shaders(&self, program: u32, max_count: usize) -> Vec<u32>;
    unsafe fn use_program(&self, program: Option<u32>);
    unsafe fn delete_program(&self, program: u32);

    // Uniforms
    unsafe fn get_uniform_location(&self, program: u32, name: &str) -> Option<u32>;
    unsafe fn uniform_1_i32(&self, location: u32, x: i32);
    unsafe fn uniform_1_f32(&self, location: u32, x: f32);
    unsafe fn uniform_2_f32(&self, location: u32, x: f32, y: f32);
    unsafe fn uniform_3_f32(&self, location: u32, x: f32, y: f32, z: f32);
    unsafe fn uniform_4_f32(&self, location: u32, x: f32, y: f32, z: f32, w: f32);
    unsafe fn uniform_matrix_4_f32_slice(&self, location: u32, transpose: bool, v: &[f32]);

    // Vertex attributes
    unsafe fn get_attrib_location(&self, program: u32, name: &str) -> Option<u32>;
    unsafe fn enable_vertex_attrib_array(&self, index: u32);
    unsafe fn disable_vertex_attrib_array(&self, index: u32);
    unsafe fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );

    // Render state
    unsafe fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    unsafe fn clear(&self, mask: u32);
    unsafe fn enable(&self, capability: u32);
    unsafe fn disable(&self, capability: u32);
    unsafe fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    unsafe fn depth_mask(&self, flag: bool);
    unsafe fn stencil_func(&self, func: u32, reference: i32, mask: u32);
    unsafe fn stencil_op(&self, stencil_fail: u32, depth_fail: u32, pass: u32);
    unsafe fn stencil_mask(&self, mask: u32);

    // Drawing
    unsafe fn draw_arrays(&self, mode: u32, first: i32, count: i32);
    unsafe fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32);

    // EXT_debug_marker
    fn has_debug_markers(&self) -> bool;
    unsafe fn insert_event_marker(&self, marker: &str);
    unsafe fn push_group_marker(&self, marker: &str);
    unsafe fn pop_group_marker(&self);
}

type GetAttachedShadersFn =
    unsafe extern "system" fn(program: u32, max_count: i32, count: *mut i32, shaders: *mut u32);
type GetFloatvFn = unsafe extern "system" fn(parameter: u32, data: *mut f32);
type MarkerFn = unsafe extern "system" fn(length: i32, marker: *const c_char);
type PopGroupMarkerFn = unsafe extern "system" fn();

/// Resolves a function pointer through the loader, or `None` when the
/// driver does not export it.
macro_rules! load_fn {
    ($loader:expr, $name:literal, $ty:ty) => {{
        let ptr = $loader($name);
        if ptr.is_null() {
            None
        } else {
            Some(mem::transmute::<*const c_void, $ty>(ptr))
        }
    }};
}

/// Entry points glow does not expose, resolved with the same loader.
struct Extras {
    get_attached_shaders: Option<GetAttachedShadersFn>,
    get_floatv: Option<GetFloatvFn>,
    insert_event_marker: Option<MarkerFn>,
    push_group_marker: Option<MarkerFn>,
    pop_group_marker: Option<PopGroupMarkerFn>,
}

/// Native OpenGL context backed by `glow`.
pub struct GlContext {
    gl: glow::Context,
    extras: Extras,
}

impl GlContext {
    /// Loads OpenGL function pointers through `loader`.
    ///
    /// # Safety
    ///
    /// The context the loader resolves against must be current on
    /// this thread.
    pub unsafe fn from_loader_function<F>(mut loader: F) -> Self
    where
        F: FnMut(&str) -> *const c_void,
    {
        let gl = glow::Context::from_loader_function(|s| loader(s));

        let extras = Extras {
            get_attached_shaders: load_fn!(loader, "glGetAttachedShaders", GetAttachedShadersFn),
            get_floatv: load_fn!(loader, "glGetFloatv", GetFloatvFn),
            insert_event_marker: load_fn!(loader, "glInsertEventMarkerEXT", MarkerFn),
            push_group_marker: load_fn!(loader, "glPushGroupMarkerEXT", MarkerFn),
            pop_group_marker: load_fn!(loader, "glPopGroupMarkerEXT", PopGroupMarkerFn),
        };

        Self { gl, extras }
    }

    /// # Safety
    ///
    /// The windowed context must be current on this thread.
    pub unsafe fn from_windowed_context(
        windowed_context: &glutin::WindowedContext<PossiblyCurrent>,
    ) -> Self {
        Self::from_loader_function(|s| windowed_context.get_proc_address(s) as *const _)
    }

    /// Underlying glow context, for calls the device does not wrap.
    pub fn glow(&self) -> &glow::Context {
        &self.gl
    }
}

impl Native for GlContext {
    unsafe fn get_error(&self) -> u32 {
        self.gl.get_error()
    }

    unsafe fn get_parameter_string(&self, parameter: u32) -> String {
        self.gl.get_parameter_string(parameter)
    }

    unsafe fn get_clear_color(&self) -> [f32; 4] {
        let mut color = [0.0; 4];
        if let Some(get_floatv) = self.extras.get_floatv {
            get_floatv(glow::COLOR_CLEAR_VALUE, color.as_mut_ptr());
        }
        color
    }

    unsafe fn create_vertex_array(&self) -> Result<u32, String> {
        self.gl.create_vertex_array()
    }

    unsafe fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.gl.bind_vertex_array(vertex_array)
    }

    unsafe fn delete_vertex_array(&self, vertex_array: u32) {
        self.gl.delete_vertex_array(vertex_array)
    }

    unsafe fn create_buffer(&self) -> Result<u32, String> {
        self.gl.create_buffer()
    }

    unsafe fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        self.gl.bind_buffer(target, buffer)
    }

    unsafe fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        self.gl.buffer_data_u8_slice(target, data, usage)
    }

    unsafe fn buffer_data_size(&self, target: u32, size: i32, usage: u32) {
        self.gl.buffer_data_size(target, size, usage)
    }

    unsafe fn delete_buffer(&self, buffer: u32) {
        self.gl.delete_buffer(buffer)
    }

    unsafe fn create_texture(&self) -> Result<u32, String> {
        self.gl.create_texture()
    }

    unsafe fn active_texture(&self, unit: u32) {
        self.gl.active_texture(unit)
    }

    unsafe fn bind_texture(&self, target: u32, texture: Option<u32>) {
        self.gl.bind_texture(target, texture)
    }

    unsafe fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        border: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) {
        self.gl.tex_image_2d(
            target,
            level,
            internal_format,
            width,
            height,
            border,
            format,
            ty,
            pixels,
        )
    }

    unsafe fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        self.gl.tex_parameter_i32(target, parameter, value)
    }

    unsafe fn delete_texture(&self, texture: u32) {
        self.gl.delete_texture(texture)
    }

    unsafe fn create_shader(&self, shader_type: u32) -> Result<u32, String> {
        self.gl.create_shader(shader_type)
    }

    unsafe fn shader_source(&self, shader: u32, source: &str) {
        self.gl.shader_source(shader, source)
    }

    unsafe fn compile_shader(&self, shader: u32) {
        self.gl.compile_shader(shader)
    }

    unsafe fn get_shader_compile_status(&self, shader: u32) -> bool {
        self.gl.get_shader_compile_status(shader)
    }

    unsafe fn get_shader_info_log(&self, shader: u32) -> String {
        self.gl.get_shader_info_log(shader)
    }

    unsafe fn delete_shader(&self, shader: u32) {
        self.gl.delete_shader(shader)
    }

    unsafe fn create_program(&self) -> Result<u32, String> {
        self.gl.create_program()
    }

    unsafe fn attach_shader(&self, program: u32, shader: u32) {
        self.gl.attach_shader(program, shader)
    }

    unsafe fn link_program(&self, program: u32) {
        self.gl.link_program(program)
    }

    unsafe fn get_program_link_status(&self, program: u32) -> bool {
        self.gl.get_program_link_status(program)
    }

    unsafe fn get_program_info_log(&self, program: u32) -> String {
        self.gl.get_program_info_log(program)
    }

    unsafe fn get_attached_shaders(&self, program: u32, max_count: usize) -> Vec<u32> {
        let get_attached_shaders = match self.extras.get_attached_shaders {
            Some(f) => f,
            None => return Vec::new(),
        };

        let mut shaders = vec![0; max_count];
        let mut count = 0;
        get_attached_shaders(
            program,
            max_count as i32,
            &mut count,
            shaders.as_mut_ptr(),
        );
        shaders.truncate(count.max(0) as usize);
        shaders
    }

    unsafe fn use_program(&self, program: Option<u32>) {
        self.gl.use_program(program)
    }

    unsafe fn delete_program(&self, program: u32) {
        self.gl.delete_program(program)
    }

    unsafe fn get_uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        self.gl.get_uniform_location(program, name)
    }

    unsafe fn uniform_1_i32(&self, location: u32, x: i32) {
        self.gl.uniform_1_i32(Some(&location), x)
    }

    unsafe fn uniform_1_f32(&self, location: u32, x: f32) {
        self.gl.uniform_1_f32(Some(&location), x)
    }

    unsafe fn uniform_2_f32(&self, location: u32, x: f32, y: f32) {
        self.gl.uniform_2_f32(Some(&location), x, y)
    }

    unsafe fn uniform_3_f32(&self, location: u32, x: f32, y: f32, z: f32) {
        self.gl.uniform_3_f32(Some(&location), x, y, z)
    }

    unsafe fn uniform_4_f32(&self, location: u32, x: f32, y: f32, z: f32, w: f32) {
        self.gl.uniform_4_f32(Some(&location), x, y, z, w)
    }

    unsafe fn uniform_matrix_4_f32_slice(&self, location: u32, transpose: bool, v: &[f32]) {
        self.gl
            .uniform_matrix_4_f32_slice(Some(&location), transpose, v)
    }

    unsafe fn get_attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        self.gl.get_attrib_location(program, name)
    }

    unsafe fn enable_vertex_attrib_array(&self, index: u32) {
        self.gl.enable_vertex_attrib_array(index)
    }

    unsafe fn disable_vertex_attrib_array(&self, index: u32) {
        self.gl.disable_vertex_attrib_array(index)
    }

    unsafe fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.gl
            .vertex_attrib_pointer_f32(index, size, data_type, normalized, stride, offset)
    }

    unsafe fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.gl.clear_color(red, green, blue, alpha)
    }

    unsafe fn clear(&self, mask: u32) {
        self.gl.clear(mask)
    }

    unsafe fn enable(&self, capability: u32) {
        self.gl.enable(capability)
    }

    unsafe fn disable(&self, capability: u32) {
        self.gl.disable(capability)
    }

    unsafe fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.gl.viewport(x, y, width, height)
    }

    unsafe fn depth_mask(&self, flag: bool) {
        self.gl.depth_mask(flag)
    }

    unsafe fn stencil_func(&self, func: u32, reference: i32, mask: u32) {
        self.gl.stencil_func(func, reference, mask)
    }

    unsafe fn stencil_op(&self, stencil_fail: u32, depth_fail: u32, pass: u32) {
        self.gl.stencil_op(stencil_fail, depth_fail, pass)
    }

    unsafe fn stencil_mask(&self, mask: u32) {
        self.gl.stencil_mask(mask)
    }

    unsafe fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.gl.draw_arrays(mode, first, count)
    }

    unsafe fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        self.gl.draw_elements(mode, count, element_type, offset)
    }

    fn has_debug_markers(&self) -> bool {
        self.extras.insert_event_marker.is_some()
            && self.extras.push_group_marker.is_some()
            && self.extras.pop_group_marker.is_some()
    }

    unsafe fn insert_event_marker(&self, marker: &str) {
        if let Some(insert_event_marker) = self.extras.insert_event_marker {
            // Explicit length, so the string needs no terminator.
            insert_event_marker(marker.len() as i32, marker.as_ptr() as *const c_char);
        }
    }

    unsafe fn push_group_marker(&self, marker: &str) {
        if let Some(push_group_marker) = self.extras.push_group_marker {
            push_group_marker(marker.len() as i32, marker.as_ptr() as *const c_char);
        }
    }

    unsafe fn pop_group_marker(&self) {
        if let Some(pop_group_marker) = self.extras.pop_group_marker {
            pop_group_marker();
        }
    }
}
