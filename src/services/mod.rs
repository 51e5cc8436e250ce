pub mod auth_service;
pub mod consult_service;
pub mod debtor_service;
pub mod order_service;
