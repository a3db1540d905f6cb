pub mod board;
pub mod calibration;
pub mod config;
pub mod data_loader;
pub mod detected_points;
pub mod detection;
pub mod error;
pub mod io;
pub mod refine;
pub mod synthetic;
pub mod visualization;

pub use error::CalibError;
