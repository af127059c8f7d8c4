/**
 * Responsibility
 *  - Bundle core and types
 *  - Control what handlers see
 */
mod core;
mod types;

pub use types::*;
