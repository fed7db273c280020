//! CPU-side assets: mesh data and the built-in furniture models.

pub mod mesh;
pub mod models;
