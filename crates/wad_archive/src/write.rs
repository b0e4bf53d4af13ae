//! Serializing the tree back into archive bytes.

use binrw::BinWrite;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::Result;
use crate::tree::{NodeId, WadTree};
use crate::types::{LumpName, WadDescriptor, WadHeader, HEADER_SIZE};

/// Flatten the tree into a descriptor list and a data blob.
///
/// Children are walked in pre-order. Directories contribute zero-length
/// descriptors at the current data cursor: a `_START` directory emits its
/// matching `_END` after its children, a map directory emits no end marker.
/// Content bytes come from the resident buffer when it matches the node
/// length, otherwise from a positioned re-read of the source archive; any
/// shortfall is zero-filled.
pub(crate) fn emit_tree<R: Read + Seek>(
    tree: &WadTree,
    source: Option<&mut R>,
) -> (Vec<WadDescriptor>, Vec<u8>) {
    let mut emitter = Emitter {
        tree,
        source,
        descriptors: Vec::new(),
        data: Vec::new(),
    };
    let children = tree.node(tree.root()).children.clone();
    for child in children {
        emitter.emit(child);
    }
    (emitter.descriptors, emitter.data)
}

/// Write a complete archive: header, data blob, then descriptor table.
pub(crate) fn write_archive<W: Write + Seek>(
    magic: [u8; 4],
    descriptors: &[WadDescriptor],
    data: &[u8],
    writer: &mut W,
) -> Result<()> {
    let header = WadHeader {
        magic,
        lump_count: descriptors.len() as u32,
        directory_offset: HEADER_SIZE + data.len() as u32,
    };
    header.write(writer)?;
    writer.write_all(data)?;
    for descriptor in descriptors {
        descriptor.write(writer)?;
    }
    Ok(())
}

struct Emitter<'a, R> {
    tree: &'a WadTree,
    source: Option<&'a mut R>,
    descriptors: Vec<WadDescriptor>,
    data: Vec<u8>,
}

impl<R: Read + Seek> Emitter<'_, R> {
    fn cursor(&self) -> u32 {
        HEADER_SIZE + self.data.len() as u32
    }

    fn emit(&mut self, id: NodeId) {
        let tree = self.tree;
        let node = tree.node(id);

        if node.is_directory() {
            self.descriptors.push(WadDescriptor {
                offset: self.cursor(),
                length: 0,
                name: node.name.clone(),
            });
            for &child in &node.children {
                self.emit(child);
            }
            if node.name.is_namespace_start() {
                self.descriptors.push(WadDescriptor {
                    offset: self.cursor(),
                    length: 0,
                    name: LumpName::new(format!("{}_END", node.name.clean())),
                });
            }
            return;
        }

        self.descriptors.push(WadDescriptor {
            offset: self.cursor(),
            length: node.length,
            name: node.name.clone(),
        });
        if node.length == 0 {
            return;
        }

        if node.data.len() == node.length as usize {
            self.data.extend_from_slice(&node.data);
            return;
        }

        // resident copy is missing; re-read from the source archive and
        // leave any shortfall zero-filled
        let base = self.data.len();
        self.data.resize(base + node.length as usize, 0);
        let Some(source) = self.source.as_deref_mut() else {
            return;
        };
        if source.seek(SeekFrom::Start(node.offset as u64)).is_err() {
            return;
        }
        let mut filled = 0;
        while filled < node.length as usize {
            match source.read(&mut self.data[base + filled..]) {
                Ok(0) | Err(_) => break,
                Ok(count) => filled += count,
            }
        }
    }
}
