pub mod extract;
pub mod listing;
pub mod locator;
pub mod task;
