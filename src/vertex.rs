//! Vertex array objects and vertex attributes.
use crate::{
    device::Device,
    handle::{self, Handle, Location},
    native::Native,
};

impl<N: Native> Device<N> {
    // ------------------------------------------------------- Vertex Array --

    pub fn gen_vertex_array(&self) -> Handle {
        let mut vaos = [0];
        self.gen_vertex_arrays(&mut vaos);
        vaos[0]
    }

    /// Fills `vaos` with newly generated vertex array handles, in order.
    pub fn gen_vertex_arrays(&self, vaos: &mut [Handle]) {
        for vao in vaos.iter_mut() {
            let result = unsafe { self.native.create_vertex_array() };
            *vao = self.allocated("Generating VAO", result);
        }
        self.check("Generating VAO");
    }

    pub fn create_vertex_array(&self) -> Handle {
        self.gen_vertex_array()
    }

    pub fn create_vertex_arrays(&self, vaos: &mut [Handle]) {
        self.gen_vertex_arrays(vaos)
    }

    /// Binding handle `0` unbinds the current vertex array.
    pub fn bind_vertex_array(&self, vao: Handle) {
        unsafe {
            self.native.bind_vertex_array(handle::to_binding(vao));
        }
        self.check("Binding VAO");
    }

    pub fn delete_vertex_array(&self, vao: Handle) {
        self.delete_vertex_arrays(&[vao]);
    }

    pub fn delete_vertex_arrays(&self, vaos: &[Handle]) {
        for vao in vaos {
            unsafe {
                self.native.delete_vertex_array(handle::to_native(*vao));
            }
        }
        self.check("Destroying VAO");
    }

    // ----------------------------------------------------- Vertex Attribs --

    /// Location of the named attribute in `program`, or `-1`.
    pub fn get_attrib_location(&self, program: Handle, name: &str) -> Location {
        let location = unsafe {
            self.native
                .get_attrib_location(handle::to_native(program), name)
        };
        self.check("Getting Attrib Location");
        handle::from_location(location)
    }

    pub fn enable_vertex_attrib_array(&self, location: Location) {
        let index = self.native_location("Enable Vertex Attrib Array", location);
        unsafe {
            self.native.enable_vertex_attrib_array(index);
        }
        self.check("Enable Vertex Attrib Array");
    }

    pub fn disable_vertex_attrib_array(&self, location: Location) {
        let index = self.native_location("Disable Vertex Attrib Array", location);
        unsafe {
            self.native.disable_vertex_attrib_array(index);
        }
        self.check("Disable Vertex Attrib Array");
    }

    /// Describes the layout of attribute `location` in the bound array buffer.
    ///
    /// `stride` and `offset` are in bytes.
    pub fn vertex_attrib_pointer(
        &self,
        location: Location,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        let index = self.native_location("Vertex Attrib Pointer", location);
        unsafe {
            self.native
                .vertex_attrib_pointer_f32(index, size, data_type, normalized, stride, offset);
        }
        self.check("Vertex Attrib Pointer");
    }

    /// Enables attribute `location` and sets its layout.
    pub fn enable_vertex_attrib_array_pointer(
        &self,
        location: Location,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.enable_vertex_attrib_array(location);
        self.vertex_attrib_pointer(location, size, data_type, normalized, stride, offset);
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

    #[test]
    fn test_gen_vertex_arrays_preserves_order() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        let mut vaos = [0; 4];
        device.gen_vertex_arrays(&mut vaos);

        assert_eq!(vaos, [1, 2, 3, 4]);
        assert_eq!(
            device.native().calls(),
            vec![
                Call::CreateVertexArray(1),
                Call::CreateVertexArray(2),
                Call::CreateVertexArray(3),
                Call::CreateVertexArray(4),
            ]
        );
    }

    #[test]
    fn test_create_forwards_to_gen() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        assert_eq!(device.create_vertex_array(), 1);

        let mut vaos = [0; 2];
        device.create_vertex_arrays(&mut vaos);
        assert_eq!(vaos, [2, 3]);
    }

    #[test]
    fn test_delete_vertex_arrays_once_each() {
        let device = Device::with_config(Recorder::new(), checked());
        device.delete_vertex_arrays(&[7, 3, 5]);

        assert_eq!(
            device.native().gl_calls(),
            vec![
                Call::DeleteVertexArray(7),
                Call::DeleteVertexArray(3),
                Call::DeleteVertexArray(5),
            ]
        );
        // A single error query for the whole batch.
        assert_eq!(device.native().count(|c| *c == Call::GetError), 1);
    }

    #[test]
    fn test_empty_batch_makes_no_native_calls() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        device.gen_vertex_arrays(&mut []);
        device.delete_vertex_arrays(&[]);
        assert!(device.native().calls().is_empty());
    }

    #[test]
    fn test_bind_zero_unbinds() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        device.bind_vertex_array(4);
        device.bind_vertex_array(0);
        assert_eq!(
            device.native().calls(),
            vec![Call::BindVertexArray(Some(4)), Call::BindVertexArray(None)]
        );
    }

    #[test]
    fn test_bind_error_reported_with_context() {
        let (device, errors) = recording_device(checked());
        device.native().push_error(glow::INVALID_OPERATION);
        device.bind_vertex_array(99);

        assert_eq!(
            errors.borrow().as_slice(),
            &[Error::OpenGl {
                context: "Binding VAO".to_string(),
                code: glow::INVALID_OPERATION,
            }]
        );
    }

    #[test]
    fn test_enable_vertex_attrib_array_pointer() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        device.native().define_location("texcoord", 2);

        let location = device.get_attrib_location(1, "texcoord");
        device.enable_vertex_attrib_array_pointer(location, 2, glow::FLOAT, false, 32, 24);

        assert_eq!(
            device.native().calls(),
            vec![
                Call::GetAttribLocation(1, "texcoord".to_string()),
                Call::EnableVertexAttribArray(2),
                Call::VertexAttribPointer {
                    index: 2,
                    size: 2,
                    data_type: glow::FLOAT,
                    normalized: false,
                    stride: 32,
                    offset: 24,
                },
            ]
        );
    }

    #[test]
    fn test_missing_attrib_is_negative() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::unchecked());
        assert_eq!(device.get_attrib_location(1, "nope"), INVALID_LOCATION);
    }

    #[test]
    fn test_param_checks_still_forward_invalid_location() {
        let (device, errors) = recording_device(DeviceConfig::unchecked().with_param_checks(true));
        device.enable_vertex_attrib_array_pointer(INVALID_LOCATION, 3, glow::FLOAT, false, 0, 0);

        assert_eq!(
            device.native().calls(),
            vec![
                Call::EnableVertexAttribArray(u32::MAX),
                Call::VertexAttribPointer {
                    index: u32::MAX,
                    size: 3,
                    data_type: glow::FLOAT,
                    normalized: false,
                    stride: 0,
                    offset: 0,
                },
            ]
        );
        assert!(errors.borrow().is_empty());
    }

    #[test]
    fn test_invalid_location_passes_through_unchecked() {
        let (device, errors) = recording_device(DeviceConfig::unchecked());
        device.disable_vertex_attrib_array(INVALID_LOCATION);

        assert_eq!(
            device.native().calls(),
            vec![Call::DisableVertexAttribArray(u32::MAX)]
        );
        assert!(errors.borrow().is_empty());
    }
}
