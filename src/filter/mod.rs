pub mod company;
pub mod error;
pub mod filter;
pub mod filter_where;
pub mod job;
pub mod types;

pub use company::CompanyFilter;
pub use error::FilterError;
pub use filter::Filter;
pub use filter_where::FilterWhere;
pub use job::JobFilter;
pub use types::*;
