//! Utility functions for loading and cropping images.

pub mod image;

pub use image::{crop_field, load_image};
