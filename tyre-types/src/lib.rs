pub mod catalog;
pub mod category;
pub mod facet;
pub mod product;
pub mod query;
pub mod slug;
pub mod spec;

pub use catalog::{Catalog, CatalogState};
pub use product::{Product, ProductsData};
pub use query::{paginate, query, Page, Selection};
