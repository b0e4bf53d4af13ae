//! This library handles reading from, modifying and writing **WAD** archive files.
//!
//! # WAD Archive Format Documentation
//!
//! A WAD file is a flat container of named byte ranges called *lumps*. The
//! format predates hierarchical archives; directories are not stored, they
//! are inferred from naming and ordering conventions in the lump directory.
//! WAD files are typically identified with the `.wad` extension.
//!
//! ## File Structure
//!
//! A WAD file consists of a header, followed by the lump data blob, followed
//! by the descriptor table.
//!
//! | Offset (bytes) | Field             | Description                                      |
//! |----------------|-------------------|--------------------------------------------------|
//! | 0x0000         | Magic number      | 4 bytes: ASCII identifier, typically `IWAD`/`PWAD` |
//! | 0x0004         | Descriptor count  | 4 bytes: number of entries in the descriptor table |
//! | 0x0008         | Table offset      | 4 bytes: absolute offset of the descriptor table |
//! | 0x000C         | Lump data         | variable: raw lump bytes, back to back           |
//! | table offset   | Descriptor table  | 16 bytes per descriptor                          |
//!
//! ### Header
//!
//! - **Magic Number**: a 4-byte ASCII identifier. `IWAD` and `PWAD` are the
//!   conventional values; the bytes are retained verbatim and written back
//!   unchanged on save.
//! - **Descriptor Count**: a 4-byte unsigned integer giving the number of
//!   16-byte entries in the descriptor table.
//! - **Table Offset**: a 4-byte unsigned integer giving the absolute offset
//!   of the descriptor table from the start of the file.
//!
//! ### Descriptor Table
//!
//! Each descriptor describes one lump:
//!
//! | Offset (bytes) | Field  | Description                                    |
//! |----------------|--------|------------------------------------------------|
//! | 0x0000         | Offset | 4 bytes: absolute offset of the lump's data    |
//! | 0x0004         | Length | 4 bytes: size of the lump's data in bytes      |
//! | 0x0008         | Name   | 8 bytes: ASCII, NUL-padded, at most 8 significant characters |
//!
//! ### Name Conventions
//!
//! Three name shapes carry structure:
//!
//! - `<DIR>_START` / `<DIR>_END`: zero-length marker lumps bracketing an
//!   explicit directory named `<DIR>`.
//! - `E<digit>M<digit>`: a *map marker*. The lumps that follow it
//!   contiguously belong to an implicit directory of that name; there is no
//!   end marker.
//! - anything else: a regular content lump.
//!
//! A historical variant stores a trailing `/` in the name field; the codec
//! preserves it on a flag so such archives survive a round trip.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.wad`
//! - **Endianness**: little-endian for all multi-byte integers
//!

pub mod archive;
pub mod error;
pub mod types;

mod build;
mod read;
mod tree;
mod write;

pub use archive::WadArchive;
pub use types::{LumpName, WadDescriptor, WadHeader};
