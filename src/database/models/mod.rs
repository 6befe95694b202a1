pub mod approved_date;
pub mod log;
pub(crate) mod macros;
pub mod request;
pub mod role;
pub mod user;
pub mod withdraw;

pub use approved_date::*;
pub use log::*;
pub use request::*;
pub use role::*;
pub use user::*;
pub use withdraw::*;
