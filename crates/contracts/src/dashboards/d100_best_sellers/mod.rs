pub mod dto;

pub use dto::{BestSellerRow, BestSellersResponse};
