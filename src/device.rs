//! Graphics device context.
use crate::{
    config::DeviceConfig,
    errors::{Error, ErrorCallback},
    handle::{Handle, Location},
    marker::Invariant,
    native::{GlContext, Native},
};
use glutin::PossiblyCurrent;
use std::{fmt, marker::PhantomData, os::raw::c_void};

/// Thin call surface over OpenGL.
///
/// Every method forwards to one native call, or a short fixed sequence
/// of them, converting object names to [`Handle`]s. Failures never
/// change control flow; they are only passed to the error callback.
pub struct Device<N: Native = GlContext> {
    pub(crate) native: N,
    config: DeviceConfig,
    error_callback: Option<ErrorCallback>,
    /// OpenGL context is bound to the thread it was made current on.
    _invariant: Invariant,
}

impl<N: Native> Device<N> {
    pub fn new(native: N) -> Self {
        Self::with_config(native, DeviceConfig::default())
    }

    pub fn with_config(native: N, config: DeviceConfig) -> Self {
        Self {
            native,
            config,
            error_callback: None,
            _invariant: PhantomData,
        }
    }

    pub fn config(&self) -> DeviceConfig {
        self.config
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    // ------------------------------------------------------------ General --

    /// Logs driver information. Calls are forwarded without any further setup.
    pub fn initialize(&self) {
        log::debug!("{}", self.opengl_info());
    }

    /// Registers the callback that receives reported errors, replacing
    /// any previous one.
    pub fn set_error_callback<F>(&mut self, callback: F)
    where
        F: Fn(&Error) + 'static,
    {
        self.error_callback = Some(Box::new(callback));
    }

    pub fn clear_error_callback(&mut self) {
        self.error_callback = None;
    }

    pub fn has_error_callback(&self) -> bool {
        self.error_callback.is_some()
    }

    /// Queries the native error state and reports a non-zero code to the
    /// error callback, tagged with `context`.
    pub fn get_error(&self, context: &str) {
        let code = unsafe { self.native.get_error() };
        if code != glow::NO_ERROR {
            self.report(Error::OpenGl {
                context: context.to_string(),
                code,
            });
        }
    }

    /// Error query performed after each forwarded call, when enabled.
    #[inline]
    pub(crate) fn check(&self, context: &str) {
        if self.config.extra_error_checks {
            self.get_error(context);
        }
    }

    pub(crate) fn report(&self, error: Error) {
        if let Some(callback) = &self.error_callback {
            callback(&error);
        }
    }

    /// Converts the outcome of a native allocation into a handle.
    ///
    /// Failures yield the null handle.
    pub(crate) fn allocated(&self, context: &str, result: Result<u32, String>) -> Handle {
        match result {
            Ok(name) => crate::handle::from_native(name),
            Err(message) => {
                log::warn!("{}: {}", context, message);
                if self.config.extra_error_checks {
                    self.report(Error::OpenGlMessage {
                        context: context.to_string(),
                        message,
                    });
                }
                0
            }
        }
    }

    /// Narrows a location for the native call.
    ///
    /// With parameter checks on, `-1` is logged. The call is forwarded
    /// either way and nothing is reported to the callback.
    pub(crate) fn native_location(&self, context: &str, location: Location) -> u32 {
        if location < 0 && self.config.extra_param_checks {
            log::warn!("{}: location {} not found", context, location);
        }

        location as u32
    }

    pub fn opengl_info(&self) -> OpenGlInfo {
        unsafe {
            let version = self.native.get_parameter_string(glow::VERSION);
            let vendor = self.native.get_parameter_string(glow::VENDOR);
            let renderer = self.native.get_parameter_string(glow::RENDERER);
            let shading_language = self
                .native
                .get_parameter_string(glow::SHADING_LANGUAGE_VERSION);
            self.check("Querying OpenGL Info");

            OpenGlInfo {
                version,
                vendor,
                renderer,
                shading_language,
            }
        }
    }

    // -------------------------------------------------------------- Clear --

    pub fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            self.native.clear_color(r, g, b, a);
        }
        self.check("Clearing Color");
    }

    pub fn clear_color_array(&self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        self.clear_color(r, g, b, a);
    }

    /// Clears the buffers selected by `mask`.
    pub fn clear(&self, mask: u32) {
        unsafe {
            self.native.clear(mask);
        }
        self.check("Clearing");
    }

    /// Clears each buffer whose flag is set, in a single call.
    pub fn clear_buffers(&self, color: bool, depth: bool, stencil: bool) {
        let mut mask = 0;
        if color {
            mask |= glow::COLOR_BUFFER_BIT;
        }
        if depth {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        if stencil {
            mask |= glow::STENCIL_BUFFER_BIT;
        }

        self.clear(mask);
    }

    pub fn clear_color_buffer(&self) {
        self.clear(glow::COLOR_BUFFER_BIT);
    }

    pub fn clear_depth_buffer(&self) {
        self.clear(glow::DEPTH_BUFFER_BIT);
    }

    pub fn clear_stencil_buffer(&self) {
        self.clear(glow::STENCIL_BUFFER_BIT);
    }

    pub fn get_clear_color(&self) -> [f32; 4] {
        let color = unsafe { self.native.get_clear_color() };
        self.check("Getting Clear Color");
        color
    }

    // ------------------------------------------------------- Render State --

    pub fn enable(&self, capability: u32) {
        unsafe {
            self.native.enable(capability);
        }
        self.check("Enable");
    }

    pub fn disable(&self, capability: u32) {
        unsafe {
            self.native.disable(capability);
        }
        self.check("Disable");
    }

    pub fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe {
            self.native.viewport(x, y, width, height);
        }
        self.check("Setting Viewport");
    }

    pub fn depth_mask(&self, write: bool) {
        unsafe {
            self.native.depth_mask(write);
        }
        self.check("Depth Mask");
    }

    pub fn stencil_func(&self, func: u32, reference: i32, mask: u32) {
        unsafe {
            self.native.stencil_func(func, reference, mask);
        }
        self.check("Stencil Func");
    }

    pub fn stencil_op(&self, stencil_fail: u32, depth_fail: u32, pass: u32) {
        unsafe {
            self.native.stencil_op(stencil_fail, depth_fail, pass);
        }
        self.check("Stencil Op");
    }

    pub fn stencil_mask(&self, mask: u32) {
        unsafe {
            self.native.stencil_mask(mask);
        }
        self.check("Stencil Mask");
    }

    // --------------------------------------------------------------- Draw --

    pub fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe {
            self.native.draw_arrays(mode, first, count);
        }
        self.check("Draw Arrays");
    }

    /// `offset` is in bytes into the bound element array buffer.
    pub fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        unsafe {
            self.native.draw_elements(mode, count, element_type, offset);
        }
        self.check("Draw Elements");
    }
}

impl Device<GlContext> {
    /// # Safety
    ///
    /// The windowed context must be current on this thread.
    pub unsafe fn from_windowed_context(
        windowed_context: &glutin::WindowedContext<PossiblyCurrent>,
    ) -> Self {
        Self::new(GlContext::from_windowed_context(windowed_context))
    }

    /// # Safety
    ///
    /// The context the loader resolves against must be current on
    /// this thread.
    pub unsafe fn from_loader_function<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const c_void,
    {
        Self::new(GlContext::from_loader_function(loader))
    }
}

pub struct OpenGlInfo {
    pub version: String,
    pub vendor: String,
    pub renderer: String,
    pub shading_language: String,
}

impl fmt::Display for OpenGlInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "OpenGL Info:")?;
        writeln!(f, "    Version: {}", self.version)?;
        writeln!(f, "    Vendor: {}", self.vendor)?;
        writeln!(f, "    Renderer: {}", self.renderer)?;
        writeln!(f, "    GLSL: {}", self.shading_language)?;

        Ok(())
    }
}
