pub mod handlers;
pub mod header;
pub mod navigation;
pub mod pages;
pub mod preview_area;
pub mod results;
pub mod theme_toggle;
pub mod treatment;
pub mod upload_section;
pub mod utils;
