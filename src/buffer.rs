//! Buffer objects.
use crate::{
    device::Device,
    handle::{self, Handle},
    native::Native,
    utils,
};

impl<N: Native> Device<N> {
    pub fn gen_buffer(&self) -> Handle {
        let mut buffers = [0];
        self.gen_buffers(&mut buffers);
        buffers[0]
    }

    /// Fills `buffers` with newly generated buffer handles, in order.
    pub fn gen_buffers(&self, buffers: &mut [Handle]) {
        for buffer in buffers.iter_mut() {
            let result = unsafe { self.native.create_buffer() };
            *buffer = self.allocated("Generating Buffers", result);
        }
        self.check("Generating Buffers");
    }

    pub fn create_buffer(&self) -> Handle {
        self.gen_buffer()
    }

    pub fn create_buffers(&self, buffers: &mut [Handle]) {
        self.gen_buffers(buffers)
    }

    /// Binding handle `0` unbinds the buffer from `target`.
    pub fn bind_buffer(&self, target: u32, buffer: Handle) {
        unsafe {
            self.native.bind_buffer(target, handle::to_binding(buffer));
        }
        self.check("Binding Buffer");
    }

    /// Uploads `data` to the buffer bound to `target`.
    ///
    /// `T` must be plain data without padding, such as `f32`, `u16` or a
    /// `#[repr(C)]` vertex struct made of them.
    pub fn buffer_data<T: Copy>(&self, target: u32, data: &[T], usage: u32) {
        unsafe {
            self.native
                .buffer_data_u8_slice(target, utils::as_u8(data), usage);
        }
        self.check("Adding Buffer Data");
    }

    /// Allocates `size` bytes of uninitialized storage.
    pub fn buffer_data_size(&self, target: u32, size: i32, usage: u32) {
        unsafe {
            self.native.buffer_data_size(target, size, usage);
        }
        self.check("Adding Buffer Data");
    }

    pub fn delete_buffer(&self, buffer: Handle) {
        self.delete_buffers(&[buffer]);
    }

    pub fn delete_buffers(&self, buffers: &[Handle]) {
        for buffer in buffers {
            unsafe {
                self.native.delete_buffer(handle::to_native(*buffer));
            }
        }
        self.check("Destroying Buffers");
    }
}
