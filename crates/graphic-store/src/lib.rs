//! Graphic-store factories and the lookup that picks one for a provider.
//!
//! A [`GraphicStoreFactory`] declares the parameters it accepts as a
//! [`ParameterSet`](store_params::ParameterSet), answers whether it can
//! process a provider URL plus raw parameters, and creates stores.
//! [`FactoryFinder`] tries registered factories in order.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use graphic_store::{FactoryFinder, GraphicStore, MemoryStoreFactory};
//! use store_params::RawParameters;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let finder = FactoryFinder::new().with(Arc::new(MemoryStoreFactory::new()?));
//!     let raw = RawParameters::from_pairs([("user", "gis"), ("password", "s3cret")]);
//!     let store = finder.create(&Url::parse("memory:symbols")?, &raw).await?;
//!     println!("{}", store.display_name());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod factory;
pub mod finder;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use factory::{password_param, username_param, GraphicStore, GraphicStoreFactory, PASSWORD, USERNAME};
pub use finder::FactoryFinder;
pub use memory::{MemoryGraphicStore, MemoryStoreFactory};
