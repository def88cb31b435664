pub mod cart_items;
pub mod carts;
pub mod canteens;
pub mod complaints;
pub mod menu_items;
pub mod order_items;
pub mod order_steps;
pub mod orders;
pub mod users;

pub use cart_items::Entity as CartItems;
pub use carts::Entity as Carts;
pub use canteens::Entity as Canteens;
pub use complaints::Entity as Complaints;
pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use order_steps::Entity as OrderSteps;
pub use orders::Entity as Orders;
pub use users::Entity as Users;
