pub(crate) mod asn1;
pub mod constants;
pub mod subject;
pub mod types;
