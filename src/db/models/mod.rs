//! Database models split into separate files.
//! This module re-exports individual model modules so imports like
//! `use crate::db::models::*;` work.

pub mod device_token;
pub mod driver;
pub mod investment_fd;
pub mod investor;
pub mod notification;
pub mod plan_selection;
pub mod transaction;
pub mod vehicle;
pub mod wallet;

pub use self::device_token::*;
pub use self::driver::*;
pub use self::investment_fd::*;
pub use self::investor::*;
pub use self::notification::*;
pub use self::plan_selection::*;
pub use self::transaction::*;
pub use self::vehicle::*;
pub use self::wallet::*;
