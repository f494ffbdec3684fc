//! Durable state: resource opt store and append-only event sink

mod db;
mod events;
mod resources;

pub use db::{open_db, setup_schema, DbPool};
pub use events::EventSink;
pub use resources::ResourceOptStore;
