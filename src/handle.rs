//! Conversion between wrapper handles and native OpenGL names.

/// Identifier of a vertex array, buffer, texture or shader program.
///
/// OpenGL names are 32-bit. They are widened so every resource kind
/// shares one handle type. Zero is the null name.
pub type Handle = usize;

/// Attribute or uniform location. `-1` means the name was not found.
pub type Location = i32;

/// Location OpenGL reports for names that are not active in a program.
pub const INVALID_LOCATION: Location = -1;

#[inline]
pub(crate) fn from_native(name: u32) -> Handle {
    name as Handle
}

/// Narrows a handle to the native name width.
#[inline]
pub(crate) fn to_native(handle: Handle) -> u32 {
    handle as u32
}

/// Zero binds nothing.
#[inline]
pub(crate) fn to_binding(handle: Handle) -> Option<u32> {
    match to_native(handle) {
        0 => None,
        name => Some(name),
    }
}

#[inline]
pub(crate) fn from_location(location: Option<u32>) -> Location {
    location.map_or(INVALID_LOCATION, |loc| loc as Location)
}
