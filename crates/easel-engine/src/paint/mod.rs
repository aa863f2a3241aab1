//! Paint model shared by producers, material keys and graphics contexts.
//!
//! Colors are linear premultiplied RGBA. Geometry types remain in `coords`.

pub mod color;

pub use color::Color;
