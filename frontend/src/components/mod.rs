pub mod curation_panel;
pub mod handlers;
pub mod header;
pub mod results;
pub mod status_panel;
pub mod upload_section;
pub mod utils;
