//! Remote synchronization.
//!
//! # Responsibility
//! - Merge remote snapshots into the local repository (`reconciler`).
//! - Talk to the remote REST endpoint (`remote`).
//! - Schedule periodic pulls and fire-and-forget pushes (`engine`).
//!
//! # Invariants
//! - Remote data only ever adds local quotes; nothing is removed.
//! - Network failures never change local state.

pub mod engine;
pub mod error;
pub mod reconciler;
pub mod remote;
