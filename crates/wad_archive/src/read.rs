//! Tolerant reading of the archive regions.
//!
//! Loading never fails past opening the file: a short header degrades to an
//! empty archive, a truncated descriptor table keeps the entries that
//! parsed, and unreadable lump data is left empty for the serializer to
//! zero-fill.

use binrw::BinRead;
use std::io::{Read, Seek, SeekFrom};
use tracing::{debug, warn};

use crate::tree::WadTree;
use crate::types::{WadDescriptor, WadHeader};

/// Read the 12-byte header, or the default (empty magic, no descriptors)
/// when the file is too short to carry one.
pub(crate) fn read_header<R: Read + Seek>(reader: &mut R) -> WadHeader {
    if reader.seek(SeekFrom::Start(0)).is_err() {
        return WadHeader::default();
    }
    match WadHeader::read(reader) {
        Ok(header) => header,
        Err(err) => {
            warn!(%err, "unreadable header, treating the archive as empty");
            WadHeader::default()
        }
    }
}

/// Read up to `lump_count` descriptors from the table offset, keeping
/// whatever parsed when the table ends early.
pub(crate) fn read_descriptors<R: Read + Seek>(
    reader: &mut R,
    header: &WadHeader,
) -> Vec<WadDescriptor> {
    let mut descriptors = Vec::new();
    if header.lump_count == 0 {
        return descriptors;
    }
    if reader
        .seek(SeekFrom::Start(header.directory_offset as u64))
        .is_err()
    {
        return descriptors;
    }

    for index in 0..header.lump_count {
        match WadDescriptor::read(reader) {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(err) => {
                debug!(index, %err, "descriptor table ends early");
                break;
            }
        }
    }

    descriptors
}

/// Materialise every content lump's bytes into its resident buffer with
/// positioned reads. A failed read leaves the node in place with an empty
/// buffer; its length is preserved.
pub(crate) fn load_lump_data<R: Read + Seek>(tree: &mut WadTree, reader: &mut R) {
    for id in tree.content_ids() {
        let (offset, length) = {
            let node = tree.node(id);
            (node.offset, node.length)
        };
        if length == 0 {
            continue;
        }

        let mut data = vec![0u8; length as usize];
        let loaded = reader.seek(SeekFrom::Start(offset as u64)).is_ok()
            && reader.read_exact(&mut data).is_ok();

        let node = tree.node_mut(id);
        if loaded {
            node.data = data;
        } else {
            warn!(name = node.name.as_str(), "lump data unreadable, leaving it empty");
            node.data.clear();
        }
    }
}
