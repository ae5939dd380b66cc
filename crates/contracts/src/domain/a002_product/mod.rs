pub mod aggregate;

pub use aggregate::{
    CategoryRef, Product, ProductDto, ProductId, ProductListResponse, ProductPatch, ProductView,
};
