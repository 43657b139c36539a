// Dashboard handlers (d100-d101)
pub mod d100_sales_analysis;
pub mod d101_customer_analysis;

pub mod session;
