//! Shader programs and uniforms.
use crate::{
    device::Device,
    handle::{self, Handle, Location},
    native::Native,
};

/// Most stages `create_program` attaches: vertex, geometry and fragment.
const MAX_ATTACHED_SHADERS: usize = 3;

impl<N: Native> Device<N> {
    /// Compiles the given stages and links them into a new program.
    ///
    /// The geometry stage is skipped when `geometry` is `None` or at most
    /// one byte long. Compile and link failures are logged with the
    /// driver's info log; the program handle is returned regardless.
    pub fn create_program(&self, vertex: &str, geometry: Option<&str>, fragment: &str) -> Handle {
        let vert_shd = self.compile_stage(glow::VERTEX_SHADER, vertex);

        let geo_shd = match geometry {
            Some(source) if source.len() > 1 => {
                Some(self.compile_stage(glow::GEOMETRY_SHADER, source))
            }
            _ => None,
        };

        let frag_shd = self.compile_stage(glow::FRAGMENT_SHADER, fragment);

        let result = unsafe { self.native.create_program() };
        let program = handle::to_native(self.allocated("Compiling Program", result));

        unsafe {
            self.native.attach_shader(program, vert_shd);
            if let Some(geo_shd) = geo_shd {
                self.native.attach_shader(program, geo_shd);
            }
            self.native.attach_shader(program, frag_shd);

            self.native.link_program(program);
            if !self.native.get_program_link_status(program) {
                log::warn!(
                    "Linking program {} failed: {}",
                    program,
                    self.native.get_program_info_log(program)
                );
            }
        }

        self.check("Compiling Program");
        log::debug!(
            "Created program {} ({} stages)",
            program,
            if geo_shd.is_some() { 3 } else { 2 }
        );

        handle::from_native(program)
    }

    fn compile_stage(&self, shader_type: u32, source: &str) -> u32 {
        let result = unsafe { self.native.create_shader(shader_type) };
        let shader = handle::to_native(self.allocated("Compiling Program", result));

        unsafe {
            self.native.shader_source(shader, source);
            self.native.compile_shader(shader);
            if !self.native.get_shader_compile_status(shader) {
                log::warn!(
                    "Compiling {} failed: {}",
                    stage_name(shader_type),
                    self.native.get_shader_info_log(shader)
                );
            }
        }

        shader
    }

    /// Binding handle `0` leaves no program in use.
    pub fn use_program(&self, program: Handle) {
        unsafe {
            self.native.use_program(handle::to_binding(program));
        }
        self.check("Use Program");
    }

    /// Deletes every shader attached to `program`, then the program itself.
    pub fn delete_program(&self, program: Handle) {
        let program = handle::to_native(program);

        unsafe {
            let shaders = self
                .native
                .get_attached_shaders(program, MAX_ATTACHED_SHADERS);
            for shader in shaders {
                self.native.delete_shader(shader);
            }
        }
        self.check("Deleting Shaders");

        unsafe {
            self.native.delete_program(program);
        }
        self.check("Deleting Program");
    }

    // ----------------------------------------------------------- Uniforms --

    /// Location of the named uniform in `program`, or `-1`.
    pub fn get_uniform_location(&self, program: Handle, name: &str) -> Location {
        let location = unsafe {
            self.native
                .get_uniform_location(handle::to_native(program), name)
        };
        self.check("Getting Uniform Location");
        handle::from_location(location)
    }

    pub fn uniform_1_i32(&self, location: Location, x: i32) {
        let location = self.native_location("Uniform 1i", location);
        unsafe {
            self.native.uniform_1_i32(location, x);
        }
        self.check("Uniform 1i");
    }

    pub fn uniform_1_f32(&self, location: Location, x: f32) {
        let location = self.native_location("Uniform 1f", location);
        unsafe {
            self.native.uniform_1_f32(location, x);
        }
        self.check("Uniform 1f");
    }

    pub fn uniform_2_f32(&self, location: Location, x: f32, y: f32) {
        let location = self.native_location("Uniform 2f", location);
        unsafe {
            self.native.uniform_2_f32(location, x, y);
        }
        self.check("Uniform 2f");
    }

    pub fn uniform_3_f32(&self, location: Location, x: f32, y: f32, z: f32) {
        let location = self.native_location("Uniform 3f", location);
        unsafe {
            self.native.uniform_3_f32(location, x, y, z);
        }
        self.check("Uniform 3f");
    }

    pub fn uniform_4_f32(&self, location: Location, x: f32, y: f32, z: f32, w: f32) {
        let location = self.native_location("Uniform 4f", location);
        unsafe {
            self.native.uniform_4_f32(location, x, y, z, w);
        }
        self.check("Uniform 4f");
    }

    /// Uploads one or more column-major 4x4 matrices.
    pub fn uniform_matrix_4_f32(&self, location: Location, transpose: bool, matrices: &[f32]) {
        debug_assert!(matrices.len() % 16 == 0);

        let location = self.native_location("Uniform Matrix 4fv", location);
        unsafe {
            self.native
                .uniform_matrix_4_f32_slice(location, transpose, matrices);
        }
        self.check("Uniform Matrix 4fv");
    }
}

fn stage_name(shader_type: u32) -> &'static str {
    match shader_type {
        glow::VERTEX_SHADER => "vertex shader",
        glow::GEOMETRY_SHADER => "geometry shader",
        glow::FRAGMENT_SHADER => "fragment shader",
        _ => "shader",
    }
}

#[cfg(test)]
mod test {
    use crate::{
        config::DeviceConfig,
        device::{
            test::{checked, recording_device},
            Device,
        },
        errors::Error,
        handle::INVALID_LOCATION,
        native::mock::{Call, Recorder},
    };

    const VS: &str = "void main() { gl_Position = vec4(0.0); }";
    const GS: &str = "layout(points) in; void main() {}";
    const FS: &str = "out vec4 c; void main() { c = vec4(1.0); }";

    fn geometry_calls(device: &Device<Recorder>) -> usize {
        device
            .native()
            .count(|c| matches!(c, Call::CreateShader(glow::GEOMETRY_SHADER, _)))
    }

    #[test]
    fn test_create_program_vertex_fragment() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        let program = device.create_program(VS, None, FS);

        assert_eq!(program, 3);
        assert_eq!(
            device.native().calls(),
            vec![
                Call::CreateShader(glow::VERTEX_SHADER, 1),
                Call::ShaderSource(1, VS.to_string()),
                Call::CompileShader(1),
                Call::CreateShader(glow::FRAGMENT_SHADER, 2),
                Call::ShaderSource(2, FS.to_string()),
                Call::CompileShader(2),
                Call::CreateProgram(3),
                Call::AttachShader(3, 1),
                Call::AttachShader(3, 2),
                Call::LinkProgram(3),
            ]
        );
    }

    #[test]
    fn test_create_program_with_geometry() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        let program = device.create_program(VS, Some(GS), FS);

        assert_eq!(program, 4);
        assert_eq!(geometry_calls(&device), 1);
        assert_eq!(
            device
                .native()
                .count(|c| matches!(c, Call::AttachShader(4, _))),
            3
        );
        assert!(device
            .native()
            .calls()
            .contains(&Call::AttachShader(4, 2)));
    }

    #[test]
    fn test_short_geometry_source_is_skipped() {
        for geometry in [None, Some(""), Some(" ")].iter().copied() {
            let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
            device.create_program(VS, geometry, FS);

            assert_eq!(geometry_calls(&device), 0);
            assert_eq!(
                device
                    .native()
                    .count(|c| matches!(c, Call::AttachShader(..))),
                2
            );
        }
    }

    #[test]
    fn test_two_byte_geometry_source_is_compiled() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        device.create_program(VS, Some("//"), FS);
        assert_eq!(geometry_calls(&device), 1);
    }

    #[test]
    fn test_compile_failure_keeps_going() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        device.native().compile_ok.set(false);
        device.native().link_ok.set(false);

        assert_eq!(device.create_program(VS, None, FS), 3);
        assert_eq!(
            device
                .native()
                .count(|c| matches!(c, Call::LinkProgram(3))),
            1
        );
    }

    #[test]
    fn test_create_program_reports_once() {
        let (device, errors) = recording_device(checked());
        device.native().push_error(glow::INVALID_OPERATION);
        device.create_program(VS, Some(GS), FS);

        assert_eq!(device.native().count(|c| *c == Call::GetError), 1);
        assert_eq!(errors.borrow()[0].context(), "Compiling Program");
    }

    #[test]
    fn test_delete_program_deletes_attached_shaders() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        let program = device.create_program(VS, Some(GS), FS);
        device.native().reset();

        device.delete_program(program);

        assert_eq!(
            device.native().calls(),
            vec![
                Call::GetAttachedShaders(4, 3),
                Call::DeleteShader(1),
                Call::DeleteShader(2),
                Call::DeleteShader(3),
                Call::DeleteProgram(4),
            ]
        );
    }

    #[test]
    fn test_delete_program_checks_each_step() {
        let (device, errors) = recording_device(checked());
        device.native().push_error(glow::NO_ERROR);
        device.native().push_error(glow::INVALID_VALUE);
        device.delete_program(42);

        assert_eq!(
            errors.borrow().as_slice(),
            &[Error::OpenGl {
                context: "Deleting Program".to_string(),
                code: glow::INVALID_VALUE,
            }]
        );
    }

    #[test]
    fn test_use_program_zero_unbinds() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        device.use_program(3);
        device.use_program(0);
        assert_eq!(
            device.native().calls(),
            vec![Call::UseProgram(Some(3)), Call::UseProgram(None)]
        );
    }

    #[test]
    fn test_uniforms_forward_to_location() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        device.native().define_location("texKitten", 4);

        let location = device.get_uniform_location(1, "texKitten");
        device.uniform_1_i32(location, 0);
        device.uniform_3_f32(location, 0.3, 0.3, 0.3);
        let identity = [
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ];
        device.uniform_matrix_4_f32(location, false, &identity);

        assert_eq!(
            device.native().calls(),
            vec![
                Call::GetUniformLocation(1, "texKitten".to_string()),
                Call::Uniform1i(4, 0),
                Call::Uniform3f(4, [0.3, 0.3, 0.3]),
                Call::UniformMatrix4(4, false, identity.to_vec()),
            ]
        );
    }

    #[test]
    fn test_missing_uniform_is_forwarded() {
        let (device, errors) = recording_device(DeviceConfig::unchecked().with_param_checks(true));
        let location = device.get_uniform_location(1, "missing");
        assert_eq!(location, INVALID_LOCATION);

        device.uniform_1_f32(location, 1.0);
        device.uniform_2_f32(location, 1.0, 2.0);
        device.uniform_4_f32(location, 1.0, 2.0, 3.0, 4.0);

        let calls = device.native().gl_calls();
        assert_eq!(
            calls[1..],
            [
                Call::Uniform1f(u32::MAX, 1.0),
                Call::Uniform2f(u32::MAX, [1.0, 2.0]),
                Call::Uniform4f(u32::MAX, [1.0, 2.0, 3.0, 4.0]),
            ]
        );
        assert!(errors.borrow().is_empty());
    }

    #[test]
    fn test_missing_uniform_reports_only_native_errors() {
        let (device, errors) = recording_device(checked());
        device.native().push_error(glow::NO_ERROR);
        device.native().push_error(glow::INVALID_OPERATION);
        device.uniform_1_i32(INVALID_LOCATION, 0);
        device.uniform_3_f32(INVALID_LOCATION, 0.0, 0.0, 0.0);

        assert_eq!(
            errors.borrow().as_slice(),
            &[Error::OpenGl {
                context: "Uniform 3f".to_string(),
                code: glow::INVALID_OPERATION,
            }]
        );
    }
}
