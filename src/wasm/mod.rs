//! WebAssembly bindings for the emulator.
//!
//! Exposes a CPU on flat memory together with its debugger to JavaScript, so a
//! browser front end can step code, set breakpoints and watchpoints, and read
//! traces and dumps.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::Emulator;
