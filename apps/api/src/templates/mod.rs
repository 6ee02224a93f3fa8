// Resume templates: stored layouts with a component mapping and style settings,
// created directly or imported from a URL.

pub mod download;
pub mod handlers;
pub mod queries;
