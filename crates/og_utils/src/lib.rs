#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

//! Utilities shared by the `og_*` crates.

// -----------------------------------------------------------------------------
// No STD Support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod hash;
