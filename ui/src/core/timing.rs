//! Timer primitives shared by the polling loop.

/// Asynchronous sleep that works on both the browser and native targets.
pub async fn sleep_ms(duration_ms: u64) {
    #[cfg(target_arch = "wasm32")]
    {
        gloo_timers::future::TimeoutFuture::new(duration_ms as u32).await;
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tokio::time::sleep(std::time::Duration::from_millis(duration_ms)).await;
    }
}
