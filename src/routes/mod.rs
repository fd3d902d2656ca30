pub mod auth;
pub mod device_tokens;
pub mod drivers;
pub mod health;
pub mod investment_fds;
pub mod investors;
pub mod notifications;
pub mod plan_selections;
pub mod transactions;
pub mod vehicles;
pub mod wallet;
pub mod ws;
