pub mod canteen_service;
pub mod cart_service;
pub mod complaint_service;
pub mod menu_service;
pub mod order_service;
pub mod user_service;
