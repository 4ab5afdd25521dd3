use std::marker::PhantomData;

/// Opts a type out of `Send` and `Sync`.
///
/// OpenGL calls must happen on the thread that holds the current context.
pub(crate) type Invariant = PhantomData<*const ()>;
