// Select-plus library - exposes the control, its markup model and the demo host

pub mod app;
pub mod config;
pub mod markup;
pub mod primitives;
pub mod services;
pub mod view;
