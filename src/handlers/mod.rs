pub mod approved_dates;
pub mod logs;
pub mod requests;
pub mod roles;
pub mod schedule;
pub mod shared;
pub mod users;
pub mod withdrawals;
