//! Mathematical utilities and data structures

pub mod aabb;
pub mod ray;
pub mod triangle;
pub mod vector;

pub use aabb::Aabb;
pub use ray::Ray;
