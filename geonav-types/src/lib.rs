//! # geonav-types
//!
//! Plain data types shared by the geonav engine and its callers:
//!
//! - **Boxes**: `GeoBox`, an upper-left / lower-right geographic rectangle
//! - **Tiles**: `TileAddress`, a (x, y, depth) address inside a quadtree tile pyramid
//!
//! All types are serializable with Serde and interoperate with the `geo`
//! crate's primitives.
//!
//! ## Examples
//!
//! ```rust
//! use geonav_types::tile::TileAddress;
//!
//! let tile = TileAddress::new(3, 1, 2);
//! assert_eq!(tile.sequence(), 7);
//! assert_eq!(TileAddress::from_sequence(7, 2), tile);
//! assert_eq!(tile.file_name(), "d2_x3_y1");
//! ```

pub mod bbox;
pub mod tile;

pub use bbox::GeoBox;
pub use tile::TileAddress;
