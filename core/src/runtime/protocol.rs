//! Declaration macros for resumable bodies

/// Declare a body's parameters and locals in one fixed, branch-free block.
///
/// Each entry expands to one positional fetch against the stack, in order:
/// `param` fetches a slot the caller must already have pushed, `local`
/// fetches it or creates it with `Default::default()` on the first pass.
/// Because the list is a single macro invocation it cannot sit behind a
/// branch, so every pass replays the same sequence.
///
/// ```
/// use latent_core::prologue;
/// use latent_core::runtime::{CallStack, FrameScope, LatentError, ResumePoint, Step};
///
/// fn double(stack: &mut CallStack) -> Result<Step, LatentError> {
///     prologue!(stack;
///         param value: i64,
///         local doubled: i64,
///     );
///
///     let mut scope = FrameScope::enter(stack)?;
///     match scope.resume_point()? {
///         ResumePoint::START => {
///             let v = *scope.get(value)?;
///             scope.set(doubled, v * 2)?;
///             Ok(Step::Done)
///         }
///         other => Err(LatentError::unknown_resume_point(other)),
///     }
/// }
/// # let _ = double;
/// ```
#[macro_export]
macro_rules! prologue {
    ($stack:ident; $($kind:ident $name:ident : $ty:ty),* $(,)?) => {
        $( let $name = $crate::prologue!(@fetch $kind $stack $ty); )*
    };
    (@fetch param $stack:ident $ty:ty) => {
        $stack.param::<$ty>()?
    };
    (@fetch local $stack:ident $ty:ty) => {
        $stack.local::<$ty>()?
    };
}
