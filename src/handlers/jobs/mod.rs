pub mod collection;
pub mod record;

pub use collection::{job_create, job_list};
pub use record::{job_delete, job_get, job_update};
