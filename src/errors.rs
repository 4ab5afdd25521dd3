use thiserror::Error;

/// Failure observed after forwarding a call to OpenGL.
///
/// Errors never change the device's control flow. They are only
/// handed to the callback registered with
/// [`Device::set_error_callback`](crate::device::Device::set_error_callback).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `glGetError` returned a non-zero code after a call.
    #[error("{context}: OpenGL Error: 0x{code:x}")]
    OpenGl { context: String, code: u32 },
    /// The driver refused to allocate an object name.
    #[error("{context}: OpenGL Error: {message}")]
    OpenGlMessage { context: String, message: String },
}

impl Error {
    /// Native error code, when the error came from `glGetError`.
    pub fn code(&self) -> Option<u32> {
        match self {
            Error::OpenGl { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Message supplied by the call site that detected the error.
    pub fn context(&self) -> &str {
        match self {
            Error::OpenGl { context, .. } | Error::OpenGlMessage { context, .. } => context,
        }
    }
}

/// Receives every error the device reports.
pub type ErrorCallback = Box<dyn Fn(&Error)>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display_includes_hex_code() {
        let err = Error::OpenGl {
            context: "Binding VAO".to_string(),
            code: glow::INVALID_OPERATION,
        };
        assert_eq!(err.to_string(), "Binding VAO: OpenGL Error: 0x502");
        assert_eq!(err.code(), Some(0x502));
        assert_eq!(err.context(), "Binding VAO");
    }

    #[test]
    fn test_allocation_errors_have_no_code() {
        let err = Error::OpenGlMessage {
            context: "Generating Buffers".to_string(),
            message: "out of names".to_string(),
        };
        assert_eq!(err.code(), None);
        assert_eq!(
            err.to_string(),
            "Generating Buffers: OpenGL Error: out of names"
        );
    }
}
