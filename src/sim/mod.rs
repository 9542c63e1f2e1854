//! Scene objects and their simulation rules
//!
//! Everything here is GPU-free so it can be exercised headless:
//! - Variable timestep (the scene clamps frame deltas)
//! - Lifecycle misuse panics at the call site
//! - No rendering or platform dependencies beyond draw descriptions

pub mod census;
pub mod input;
pub mod lifecycle;
pub mod light;
pub mod object;
pub mod player;
pub mod projectile;
pub mod props;
pub mod spawner;
pub mod sphere;

pub use census::{LiveCount, LiveToken};
pub use input::TickInput;
pub use lifecycle::Lifecycle;
pub use light::StaticLight;
pub use object::{DrawItem, GameObject, MeshMaterial};
pub use player::Player;
pub use projectile::Projectile;
pub use props::{PropKind, StaticProp};
pub use spawner::Spawner;
pub use sphere::BoundingSphere;
