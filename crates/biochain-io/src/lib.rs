//! # biochain-io: Supply Chain Data Ingestion
//!
//! Reads the tabular inputs of a planning data set into
//! [`biochain_core::NetworkData`].
//!
//! ## Data Directory Layout
//!
//! | File | Columns | Required |
//! |------|---------|----------|
//! | `suppliers.csv` | `id, supply` | yes |
//! | `plants.csv` | `id` | yes |
//! | `hubs.csv` | `id` | for hubbed scenarios |
//! | `roads_s_p.csv` | `origin, destination, distance, rate` | for direct scenarios |
//! | `roads_s_h.csv` | `origin, destination, distance, rate` | for hubbed scenarios |
//! | `railroads_h_p.csv` | `origin, destination, distance, rate` | for hubbed scenarios |
//!
//! Every file starts with a header line, which is skipped. Columns are read
//! by position and extra trailing columns are ignored.
//!
//! ## Error Recovery
//!
//! Malformed lines do not stop the load. They are recorded in the returned
//! diagnostics (with their line number) so a user sees every problem at once;
//! [`importers::LoadResult::into_data`] then refuses to hand out data that
//! had errors.
//!
//! ```rust,no_run
//! use biochain_io::importers::load_data_dir;
//!
//! fn main() -> anyhow::Result<()> {
//!     let result = load_data_dir("data/task2")?;
//!     println!("{}", result.diagnostics.summary());
//!     let data = result.into_data()?;
//!     println!("{} suppliers", data.sources.len());
//!     Ok(())
//! }
//! ```

pub mod importers;

pub use importers::{load_data_dir, LoadResult};
