pub mod approved_date;
pub mod log;
pub mod request;
pub mod role;
pub mod user;
pub mod withdraw;

pub use approved_date::ApprovedDateRepository;
pub use log::LogRepository;
pub use request::RequestRepository;
pub use role::RoleRepository;
pub use user::UserRepository;
pub use withdraw::WithdrawRepository;
