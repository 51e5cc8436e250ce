pub mod auth;
pub mod consult;
pub mod debtors;
pub mod orders;
