pub mod dates;
pub mod descriptor;
pub mod filter;
pub mod query;
pub mod state;
pub mod stats;
pub mod types;

pub use dates::*;
pub use descriptor::*;
pub use filter::*;
pub use query::*;
pub use state::*;
pub use stats::*;
pub use types::*;
