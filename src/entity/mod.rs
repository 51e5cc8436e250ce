pub mod debtors;
pub mod order_history;
pub mod orders;
pub mod users;

pub use debtors::Entity as Debtors;
pub use order_history::Entity as OrderHistory;
pub use orders::Entity as Orders;
pub use users::Entity as Users;
