pub mod api;
pub mod bootstrap;
pub mod modules;
pub mod runner;
