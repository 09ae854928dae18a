//! # cf-engine — CascadeForge deterministic simulation core
//!
//! A fully deterministic simulator for a 5×5 cluster-pays slot game with
//! cascading avalanches, guaranteed wild spawning, explosivo wilds, a
//! progressive multiplier trail, and an upgradeable free-spins feature.
//!
//! ## Features
//!
//! - **Cluster pays**: union-find detection with wild multi-participation
//! - **Avalanches**: removal, spawning, gravity and refill per cascade step
//! - **Explosivo wilds**: tracked eligibility and simultaneous 3×3 blasts
//! - **Multiplier trails**: base-game trail plus upgradeable free-spin trails
//! - **Determinism**: one seeded stream, pinned draw procedures, fixed orders
//!
//! ## Architecture
//!
//! ```text
//! RoundEngine
//!     │
//!     ├── GameConfig (weights, paytable, awards, trails)
//!     ├── GameRng    (seeded ChaCha8 stream)
//!     ├── Grid       (gravity + weighted refill)
//!     ├── find_clusters / spawn_wilds / ExplosionEngine
//!     └── FreeSpinsState (base level, collection meter, upgrades)
//!           │
//!           v
//!     RoundResult (cascade steps, session summary, cap flag)
//! ```

pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod explosion;
pub mod free_spins;
pub mod grid;
pub mod multiplier;
pub mod rng;
pub mod scenario;
pub mod spawner;
pub mod spin;
pub mod symbols;

pub use cluster::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use explosion::*;
pub use free_spins::*;
pub use grid::*;
pub use multiplier::*;
pub use rng::*;
pub use scenario::*;
pub use spawner::*;
pub use spin::*;
pub use symbols::*;
