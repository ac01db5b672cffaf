//! Platform glue for running fire-and-forget futures.

/// Spawns a future onto the host scheduler without awaiting it.
#[cfg(target_arch = "wasm32")]
pub fn spawn_future<F>(future: F)
where
    F: std::future::Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

/// Native fallback so the shared components stay compilable off-wasm: uses
/// the ambient tokio runtime when one exists, otherwise runs inline.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_future<F>(future: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        handle.spawn(future);
    } else {
        futures::executor::block_on(future);
    }
}
