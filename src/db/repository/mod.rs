pub mod device_token_repository;
pub mod driver_repository;
pub mod investment_fd_repository;
pub mod investor_repository;
pub mod notification_repository;
pub mod plan_selection_repository;
pub mod transaction_repository;
pub mod vehicle_repository;
pub mod wallet_repository;

pub use device_token_repository::DeviceTokenRepository;
pub use driver_repository::DriverRepository;
pub use investment_fd_repository::{FdStats, InvestmentFdRepository};
pub use investor_repository::InvestorRepository;
pub use notification_repository::{NotificationRepository, ReadScope};
pub use plan_selection_repository::PlanSelectionRepository;
pub use transaction_repository::TransactionRepository;
pub use vehicle_repository::VehicleRepository;
pub use wallet_repository::WalletRepository;
