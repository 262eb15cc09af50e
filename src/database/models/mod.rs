pub mod company;
pub mod job;

pub use company::{Company, CompanyDetail, CompanyJob, CompanyUpdate, NewCompany};
pub use job::{Equity, Job, JobUpdate, NewJob};

use serde::{Deserialize, Deserializer};

/// Lets `Option<Option<T>>` tell an absent field (`None`) from an explicit
/// `null` (`Some(None)`). Use together with `#[serde(default)]`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
