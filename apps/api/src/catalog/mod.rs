// Resume catalog: reusable components, employment history and saved job descriptions.

pub mod handlers;
pub mod queries;
