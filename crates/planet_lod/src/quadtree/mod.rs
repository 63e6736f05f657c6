//! Quadtree module for cube-sphere LOD subdivision.
//!
//! Each of the six cube faces owns a quadtree over the face plane
//! `[-radius, radius]²`. Nodes close to the viewer (measured at their center
//! projected onto the sphere) split into four quadrants until the minimum
//! node size is reached.
//!
//! # Split Rule
//!
//! ```text
//! split(n) = |n.sphere_center - viewer| < n.size * comparator
//!            && n.size / 2 >= min_node_size
//! ```
//!
//! # Module Structure
//!
//! - [`bounds`]: `FaceBounds` - 2D face-local box
//! - [`face`]: `CubeFace` - the six faces and their transforms
//! - [`node`]: `QuadtreeNode` - recursive subdivision
//! - [`tree`]: `Quadtree` - one face
//! - [`cubic`]: `CubicQuadTree` - six faces, leaf aggregation
//! - [`id`]: `ChunkId` - deterministic patch identity

pub mod bounds;
pub mod cubic;
pub mod face;
pub mod id;
pub mod node;
pub mod tree;

// Re-exports
pub use bounds::FaceBounds;
pub use cubic::{CubicQuadTree, FaceLeaf};
pub use face::{face_transforms, CubeFace, CUBE_FACES};
pub use id::ChunkId;
pub use node::QuadtreeNode;
pub use tree::Quadtree;
