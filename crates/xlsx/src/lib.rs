//! XLSX loader for news clippings.
//!
//! Cell values come from `calamine`; hyperlink targets are not part of
//! the cell data, so they are read straight out of the sheet XML and
//! its relationships part.

pub mod hyperlinks;
pub mod loader;

pub use loader::load_clippings;
