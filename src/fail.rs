//! General error handling.

use std::sync::atomic::{self, AtomicPtr};

use shim::config;

static OOM_HANDLER: AtomicPtr<()> = AtomicPtr::new(config::default_oom_handler as *mut ());

/// The memory subsystem could not satisfy a request.
///
/// This is only produced once the pool and every fallback (arena growth, scavenging larger free
/// lists) are exhausted, and the system allocator refused as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("memory exhausted")]
pub struct AllocError;

/// Failure of a fallible bulk construction.
///
/// `E` is the error type of the element producer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error<E> {
    /// Raw storage could not be obtained.
    #[error(transparent)]
    Alloc(#[from] AllocError),
    /// The element producer failed.
    #[error("element construction failed: {0:?}")]
    Construct(E),
}

/// Call the OOM handler.
///
/// This is used on out-of-memory errors in the infallible entry points, and will never return.
/// Usually, it simply consists of aborting the process.
///
/// # An important note
///
/// Every infallible entry point that allocates has a `try_` counterpart which returns
/// [`AllocError`] instead of ending up here.
#[cold]
pub fn oom() -> ! {
    log!(ERROR, "Out of memory, calling the OOM handler.");

    let handler = OOM_HANDLER.load(atomic::Ordering::SeqCst);
    // LAST AUDIT: only `fn() -> !` pointers are ever stored.
    let handler = unsafe { std::mem::transmute::<*mut (), fn() -> !>(handler) };

    handler()
}

/// Set the OOM handler.
///
/// This is called when the process is out-of-memory.
#[inline]
pub fn set_oom_handler(handler: fn() -> !) {
    log!(NOTE, "Setting the OOM handler.");

    OOM_HANDLER.store(handler as *mut (), atomic::Ordering::SeqCst);
}

/// Unwrap an allocation result, calling the OOM handler on failure.
#[inline]
pub fn or_oom<T>(res: Result<T, AllocError>) -> T {
    match res {
        Ok(x) => x,
        Err(AllocError) => oom(),
    }
}
