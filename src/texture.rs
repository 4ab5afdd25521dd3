//! Texture objects.
use crate::{
    device::Device,
    handle::{self, Handle},
    native::Native,
};

impl<N: Native> Device<N> {
    pub fn gen_texture(&self) -> Handle {
        let mut textures = [0];
        self.gen_textures(&mut textures);
        textures[0]
    }

    /// Fills `textures` with newly generated texture handles, in order.
    pub fn gen_textures(&self, textures: &mut [Handle]) {
        for texture in textures.iter_mut() {
            let result = unsafe { self.native.create_texture() };
            *texture = self.allocated("Generating Textures", result);
        }
        self.check("Generating Textures");
    }

    pub fn create_texture(&self) -> Handle {
        self.gen_texture()
    }

    pub fn create_textures(&self, textures: &mut [Handle]) {
        self.gen_textures(textures)
    }

    /// Binds `texture` to `target` on the active texture unit.
    pub fn bind_texture(&self, target: u32, texture: Handle) {
        unsafe {
            self.native.bind_texture(target, handle::to_binding(texture));
        }
        self.check("Binding Texture");
    }

    /// Binds `texture` to `target` on texture unit `unit`, which is an
    /// enum such as `glow::TEXTURE1`.
    ///
    /// The unit stays active afterwards.
    pub fn bind_active_texture(&self, unit: u32, target: u32, texture: Handle) {
        unsafe {
            self.native.active_texture(unit);
            self.native.bind_texture(target, handle::to_binding(texture));
        }
        self.check("Binding Active Texture");
    }

    /// Binds consecutive texture units, starting at `first_unit`, to
    /// each of `textures` on `target`.
    pub fn bind_textures(&self, target: u32, first_unit: u32, textures: &[Handle]) {
        for (i, texture) in textures.iter().enumerate() {
            unsafe {
                self.native.active_texture(first_unit.wrapping_add(i as u32));
                self.native.bind_texture(target, handle::to_binding(*texture));
            }
        }
        self.check("Binding Textures");
    }

    /// Specifies the image of the texture bound to `target`.
    ///
    /// With `pixels` as `None` storage is allocated but left undefined.
    #[allow(clippy::too_many_arguments)]
    pub fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) {
        unsafe {
            self.native.tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                0, // Border must be zero.
                format,
                ty,
                pixels,
            );
        }
        self.check("Texture Image 2D");
    }

    pub fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        unsafe {
            self.native.tex_parameter_i32(target, parameter, value);
        }
        self.check("Texture Parameter");
    }

    pub fn delete_texture(&self, texture: Handle) {
        self.delete_textures(&[texture]);
    }

    pub fn delete_textures(&self, textures: &[Handle]) {
        for texture in textures {
            unsafe {
                self.native.delete_texture(handle::to_native(*texture));
            }
        }
        self.check("Destroying Textures");
    }
}
