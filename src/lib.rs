//! Client library and terminal front-end for the product catalog API.
//!
//! The [`repository`] module talks to the REST service; the view models in
//! [`list`], [`form`] and [`dashboard`] hold screen state and call out to a
//! [`shell`] for navigation, notifications and confirmations.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use catalog::{Config, HttpRepository, ListViewModel, TerminalShell};
//!
//! # async fn example() -> catalog::Result<()> {
//! let config = Config::default();
//! let repository = Arc::new(HttpRepository::from_config(&config)?);
//! let shell = Arc::new(TerminalShell::new(false));
//!
//! let mut list = ListViewModel::new(repository, shell, &config);
//! list.reload().await?;
//! list.set_filter("books");
//! for product in list.page().items {
//!     println!("{} {}", product.name, product.price);
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod list;
pub mod repository;
pub mod shell;
pub mod teardown;

pub use catalog_core::{
    CategoryCount, Page, Product, ProductStats, SortDirection, SortKey, CATEGORIES,
};
pub use config::Config;
pub use dashboard::DashboardViewModel;
pub use error::{Error, Result};
pub use form::FormViewModel;
pub use list::ListViewModel;
pub use repository::http::HttpRepository;
pub use repository::memory::MemoryRepository;
pub use repository::ProductRepository;
pub use shell::terminal::TerminalShell;
