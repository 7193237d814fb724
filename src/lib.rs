//! Booklist application library
//!
//! Catalog and review modules plus the HTML helpers their views share.

pub mod modules;
pub mod utils;

pub use modules::register_all;
