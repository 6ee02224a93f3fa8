// Projects.
// Clusters of work orders summarised for resume use, plus automatic grouping.

pub mod grouping;
pub mod handlers;
pub mod queries;
