// === PUBLIC CONTRACT ===
// Other modules consume the shop only through the contract.
pub mod contract;

pub use contract::{client, error, model};

// === ERROR CATALOG ===
pub mod errors;

// === MODULE DEFINITION ===
pub mod module;
pub use module::Shop;

// === INTERNAL MODULES ===
// Exposed for tests; not a stable API. Use `contract` from other crates.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
