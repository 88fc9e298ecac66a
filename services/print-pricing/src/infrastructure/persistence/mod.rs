//! Persistence implementations

mod converters;
mod memory;
mod migrations;
mod postgres;
mod rows;

pub use memory::{InMemoryMaterialRepository, InMemoryPriceTierRepository, InMemoryStore};
pub use migrations::{migrations, run_migrations};
pub use postgres::{
    PostgresMaterialRepository, PostgresPriceTierRepository, PostgresPriceTierUnitOfWorkFactory,
};
