cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        compile_error!("wasm target for 'verdant_shared' crate is not supported yet.");
    } else {
        mod native;
        pub use native::{TimeError, Timer, Timestamp};
    }
}
