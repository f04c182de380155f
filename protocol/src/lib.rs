// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA Nemesis — Founding Block Generator
//!
//! Builds the first block of a NOVA network: the one block every node
//! replays to learn the initial namespaces, mosaics and balances. It is
//! produced once, offline, and then frozen forever, so every byte has to be
//! reproducible from the configuration alone.
//!
//! ## Architecture
//!
//! - **config** — Protocol constants: network bytes, entity types, layout.
//! - **configuration** — The TOML nemesis file and its validated form.
//! - **crypto** — Ed25519, SHA-256, BLAKE3. Don't roll your own.
//! - **model** — Entity headers, identifiers, addresses, the block buffer.
//! - **transaction** — Binary transaction builders and signing.
//! - **nemesis** — Transaction set, block assembly, two-phase finalization.
//!
//! ## Pipeline
//!
//! ```text
//! configuration ─▶ NemesisTransactions ─▶ assemble ─▶ extend(signed entries)
//!                                                        │
//!                         sign (provisional hash) ◀──────┘
//!                                │
//!          off-line execution ─▶ apply_execution_results (canonical hash)
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Determinism over convenience: ordered collections everywhere.
//! 2. No unsafe code. Buffers are built at their final size and filled by
//!    bounds-checked slice copies.
//! 3. Any error aborts the build. A half-built nemesis block is worthless.

pub mod config;
pub mod configuration;
pub mod crypto;
pub mod model;
pub mod nemesis;
pub mod transaction;

/// Library version, printed by `nemgen version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
