// Work orders.
// Imported gig records, title-based tagging, and their CRUD surface.

pub mod handlers;
pub mod queries;
pub mod tagging;
