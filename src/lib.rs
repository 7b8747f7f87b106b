// Library surface for headless/integration tests and reuse.
// main.rs only parses arguments and wires real stdin/stdout into the controller.
pub mod answer;
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod display;
pub mod quiz;
pub mod runtime;
pub mod selection;
pub mod session;
pub mod stats;
pub mod util;
