//! Image synthesis stages operating on the shared pixel canvas
//!
//! Each submodule implements one additive stage of the pipeline: profile
//! rendering, boundary-safe stamp compositing, background and read noise,
//! cosmic-ray injection, and the terminal detector response.

pub mod cosmic;
pub mod detector;
pub mod noise;
pub mod profile;
pub mod stamp;

pub use cosmic::inject_cosmic_rays;
pub use detector::apply_detector_response;
pub use noise::{apply_read_noise, apply_sky_background};
pub use profile::{render_gaussian_stamp, render_sersic_stamp};
pub use stamp::composite_stamp;
