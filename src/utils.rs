//! Miscellaneous utilities.
use std::{mem, slice};

/// Cast a slice to a slice of bytes.
///
/// Result will be native endianness.
///
/// # Safety
///
/// `T` must not contain padding bytes, since those are uninitialized.
pub(crate) unsafe fn as_u8<T: Copy>(buf: &[T]) -> &[u8] {
    let ptr = buf.as_ptr() as *const u8;
    let size = buf.len() * mem::size_of::<T>();
    // SAFETY: The pointer and length come from a valid &[T], so the
    //         allocation size restrictions already hold.
    slice::from_raw_parts(ptr, size)
}
