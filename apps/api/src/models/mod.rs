pub mod component;
pub mod employment;
pub mod job_description;
pub mod project;
pub mod template;
pub mod work_order;
