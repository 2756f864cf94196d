pub mod csv_writer;
pub mod droid;
#[cfg(test)]
pub mod fake_surface;
pub mod search_driver;

pub use csv_writer::*;
pub use droid::*;
pub use search_driver::*;
