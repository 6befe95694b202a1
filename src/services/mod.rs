pub mod access_policy;
pub mod lifecycle;
