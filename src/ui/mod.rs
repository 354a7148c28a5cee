//! UI module - reusable widgets shared by the main window

pub mod components;
