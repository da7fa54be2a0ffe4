// Library target for integration tests under tests/.
// The binary entry point is main.rs; this file re-declares the module tree so
// tests can drive the app through `biquest::app::App` with fake providers.
// Some code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

pub mod app;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod event;
pub mod generator;
pub mod session;
pub mod store;
pub mod ui;
pub mod worker;
