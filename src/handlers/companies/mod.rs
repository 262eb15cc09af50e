pub mod collection;
pub mod record;

pub use collection::{company_create, company_list};
pub use record::{company_delete, company_get, company_update};
