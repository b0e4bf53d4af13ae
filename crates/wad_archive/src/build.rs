//! Reconstructing the directory tree from the flat descriptor list.

use crate::tree::{Node, NodeId, WadTree};
use crate::types::WadDescriptor;

/// Build the tree view of an ordered descriptor list.
///
/// Directory boundaries are inferred from `_START`/`_END` marker pairs and
/// from map markers, whose children are the contiguous run of lumps that
/// follows them. Unbalanced markers are tolerated: an end with no matching
/// open start is ignored, a start with no end leaves its directory open.
pub(crate) fn build_tree(descriptors: &[WadDescriptor]) -> WadTree {
    let mut tree = WadTree::new();
    let mut stack = vec![tree.root()];

    for (index, descriptor) in descriptors.iter().enumerate() {
        close_finished_maps(&tree, &mut stack, descriptor);

        let top = *stack.last().expect("stack always holds root");

        if descriptor.name.is_namespace_start() {
            let dir = tree.add_child(top, Node::directory(descriptor.name.clone()));
            stack.push(dir);
        } else if descriptor.name.is_namespace_end() {
            let target = descriptor.name.clean();
            if let Some(found) = stack[1..]
                .iter()
                .rposition(|&id| tree.node(id).name.clean() == target)
            {
                // pop down to and including the nearest matching ancestor
                stack.truncate(found + 1);
            }
        } else if is_map_directory(descriptors, index) {
            let dir = tree.add_child(top, Node::directory(descriptor.name.clone()));
            stack.push(dir);
        } else {
            tree.add_child(
                top,
                Node::content(descriptor.name.clone(), descriptor.offset, descriptor.length),
            );
        }
    }

    tree
}

/// Pop map directories whose contiguous block has ended.
///
/// A map directory on top of the stack closes when the incoming descriptor
/// opens a namespace, or when the map already has children and the incoming
/// offset no longer continues its last content lump. Root is never popped.
fn close_finished_maps(tree: &WadTree, stack: &mut Vec<NodeId>, next: &WadDescriptor) {
    while stack.len() > 1 {
        let top = tree.node(*stack.last().expect("checked non-empty"));
        if !(top.is_directory() && top.name.is_map_marker()) {
            break;
        }
        if next.name.is_namespace_start() {
            stack.pop();
            continue;
        }
        let Some(&last_child) = top.children.last() else {
            break;
        };
        let last = tree.node(last_child);
        if !last.is_directory() && next.offset != last.offset.wrapping_add(last.length) {
            stack.pop();
            continue;
        }
        break;
    }
}

/// A map marker introduces a directory when it is the last descriptor, the
/// next descriptor opens a namespace, the next descriptor does not continue
/// its byte range, or it carries no data. Otherwise it is an ordinary lump.
fn is_map_directory(descriptors: &[WadDescriptor], index: usize) -> bool {
    let current = &descriptors[index];
    if !current.name.is_map_marker() {
        return false;
    }
    let Some(next) = descriptors.get(index + 1) else {
        return true;
    };
    next.name.is_namespace_start()
        || next.offset != current.offset.wrapping_add(current.length)
        || current.length == 0
}
