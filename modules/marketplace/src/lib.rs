// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::{error, model};

// === INTERNAL MODULES ===
// Exposed for the host binary and for tests; the `contract` module is the
// stable surface.
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

pub use config::MarketplaceConfig;
pub use domain::session::Session;
pub use domain::shell::Shell;
