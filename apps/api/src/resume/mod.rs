// Resume text import.
// Sectionizing pasted resume text and turning sections into component drafts.

pub mod drafts;
pub mod handlers;
pub mod sectionizer;
