mod buffer;
pub mod config;
mod debug;
pub mod device;
pub mod errors;
pub mod handle;
mod marker;
pub mod native;
mod shader;
mod texture;
mod utils;
mod vertex;

pub use crate::{
    config::DeviceConfig,
    device::Device,
    errors::Error,
    handle::{Handle, Location},
    native::{GlContext, Native},
};
