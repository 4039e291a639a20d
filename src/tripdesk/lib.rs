//! # Tripdesk Architecture
//!
//! Tripdesk is a record-management library for a small travel agency that
//! happens to ship with a CLI client. Three record kinds — clients,
//! airlines, flights — live in one JSON file; the library owns the
//! collection, the shell only renders it.
//!
//! ## The Layers
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Shell (args.rs + main.rs, binary only)                    │
//! │  - Parses arguments, prints records, owns stdout/stderr    │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Store (store.rs)                                          │
//! │  - Authoritative in-memory collection, id assignment       │
//! │  - create / delete / update / search / list, persist after │
//! │    every mutation                                          │
//! └────────────────────────────────────────────────────────────┘
//!                  │                          │
//!                  ▼                          ▼
//! ┌──────────────────────────┐  ┌────────────────────────────────┐
//! │  Model (model.rs)        │  │  Codec (codec.rs)              │
//! │  - Typed variants        │  │  - Whole-file JSON read/write  │
//! │  - Strict validation     │  │  - Lenient: absorbs corruption │
//! └──────────────────────────┘  └────────────────────────────────┘
//! ```
//!
//! ## Error Tolerance Is Two Explicit Layers
//!
//! The codec gets bytes into record mappings and never fails its caller —
//! a corrupted file degrades to an empty collection with a log diagnostic.
//! The store then runs every mapping through the strict model layer and
//! drops the ones that fail. Keeping the layers separate means one broken
//! record never takes the rest of the file with it.
//!
//! ## What Never Happens in the Library
//!
//! From `store.rs` inward, code never writes to stdout/stderr, never calls
//! `std::process::exit`, and never assumes a terminal. Diagnostics for
//! absorbed failures go through the `log` facade; the binary decides where
//! they end up.
//!
//! ## Module Overview
//!
//! - [`store`]: the record store — the entry point for all operations
//! - [`model`]: typed record variants and strict (de)serialization
//! - [`codec`]: tolerant whole-file JSON persistence
//! - [`error`]: error types

pub mod codec;
pub mod error;
pub mod model;
pub mod store;
