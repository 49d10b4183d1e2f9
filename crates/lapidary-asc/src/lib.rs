#![warn(missing_docs)]

//! GemCad facet-diagram (.asc) reading.
//!
//! Parses the line-oriented mini-language GemCad uses to describe how a
//! gemstone is cut: an index gear (`g 96`), header and footer prose
//! (`H ...` / `F ...`), and facet sets (`a <angle> <radius> <index>...`)
//! whose indices place copies of each cutting plane around the stone.
//!
//! # Example
//!
//! ```no_run
//! use lapidary_asc::read_asc;
//!
//! let program = read_asc("sgreenaway_smith3.asc").unwrap();
//! for set in &program.facet_sets {
//!     println!("{}deg at {} ({} facets)", set.angle, set.radius, set.indices.len());
//! }
//! ```

mod error;
mod lexer;
mod parser;
mod reader;

pub use error::AscError;
pub use parser::{parse, FacetProgram, FacetSet};
pub use reader::{read_asc, read_asc_from_buffer};

/// Convenience alias for results with [`AscError`].
pub type Result<T> = std::result::Result<T, AscError>;
