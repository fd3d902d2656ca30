pub mod auth;
pub mod init;
pub mod notifications;
pub mod push;
pub mod realtime;
