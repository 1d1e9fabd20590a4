//! Utility functions for image handling.

pub mod image;

pub use image::{crop_box, dynamic_to_rgb, load_image};
