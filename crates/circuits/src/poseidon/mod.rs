//! Poseidon hashing: shared parameters, native functions, R1CS gadgets.
//!
//! The native hasher and the in-circuit gadget must agree on one parameter
//! set; a proof generated against different round constants will not verify.

pub mod config;
pub mod gadgets;
pub mod native;

pub use config::poseidon_config;
pub use gadgets::{poseidon_hash_many_var, poseidon_hash_two_var};
pub use native::{poseidon_hash_many, poseidon_hash_two};
