pub mod a001_category;
pub mod a002_product;
pub mod a003_sale;
pub mod a004_user;
pub mod d100_best_sellers;
