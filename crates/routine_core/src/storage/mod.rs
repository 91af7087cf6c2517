pub mod csv_store;
mod store;

pub use store::TaskStore;
