//! The lexicon subsystem: byte I/O, header, block cache, flat tables and
//! the loader that ties them together into one `Lexicon` (components A-C).

pub mod block_cache;
pub mod header;
pub mod io;
pub mod loader;
pub mod paradigm;
pub mod stem_search;
pub mod tables;

pub use block_cache::{BlockCache, ByteSource, MmapSource, SliceSource};
pub use header::Header;
pub use loader::Lexicon;
