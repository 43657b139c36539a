pub mod d100_sales_analysis;
pub mod d101_customer_analysis;
