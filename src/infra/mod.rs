// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Concerns that touch the filesystem or process lifetime:
//
//   artifact_store.rs — reads/writes artifact directories
//                       (manifest.json + burn weight record);
//                       all-or-nothing load with cross-checks
//
//   artifact_slot.rs  — single-initialisation holder for one
//                       loaded artifact; memoises the outcome
//
//   config.rs         — ServeConfig from defaults / JSON file

/// Artifact pack/load
pub mod artifact_store;

/// Init-once artifact holder
pub mod artifact_slot;

/// Serve configuration
pub mod config;
