//! # Crayon Spatial
//!
//! A transform hierarchy that stores the position, rotation and scale of objects
//! relative to their parents, and resolves world-space transforms lazily.
//!
//! Mutations are cheap: they only mark the touched node and its descendants as
//! dirty. World transforms are recomputed on demand, walking from the queried node
//! up to its nearest clean ancestor and back down again, so the cost of a query
//! is proportional to the dirty chain instead of the depth of the whole tree.
//!
//! ```rust
//! use crayon_spatial::prelude::*;
//!
//! let mut graph = SceneGraph::new();
//! let parent = graph.create("parent");
//! let child = graph.create("child");
//!
//! graph.set_parent(child, parent, false).unwrap();
//! graph.set_local_position(parent, [10.0, 0.0, 0.0]).unwrap();
//! graph.set_local_position(child, [1.0, 0.0, 0.0]).unwrap();
//!
//! assert_eq!(graph.position(child).unwrap(), Vec3::new(11.0, 0.0, 0.0));
//! ```

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;
#[macro_use]
extern crate bitflags;

extern crate cgmath;
extern crate inlinable_string;
extern crate smallvec;

#[cfg(test)]
#[macro_use]
extern crate approx;

#[macro_use]
pub mod utils;
pub mod errors;
pub mod math;
pub mod spatial;

pub mod prelude {
    pub use crate::errors::{Error, Result};
    pub use crate::math::{Mat3, Mat4, Quat, Vec3};
    pub use crate::spatial::prelude::*;
}
