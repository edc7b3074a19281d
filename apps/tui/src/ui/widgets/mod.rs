pub mod footer;
pub mod popup;
pub mod tables;
