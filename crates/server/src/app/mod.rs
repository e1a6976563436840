pub(crate) mod bootstrap;
mod console;
pub(crate) mod loop_runner;
mod solar_panel;
