use crate::layout::{DIR_ENTRY_SIZE, NULL_INODE};

use zerocopy::{AsBytes, FromBytes};

#[repr(C)]
#[derive(AsBytes, FromBytes, Clone, Copy)]
/// One fixed 4-byte entry of the flat directory block: an inode number
/// and a two-character name plus terminator. An entry whose inode
/// number is the null inode is an empty slot, whatever its name bytes
/// say.
pub struct DirEntry {
    pub inum: u8,
    pub name: [u8; 3],
}

impl DirEntry {
    pub fn new(inum: u8, name: [u8; 2]) -> Self {
        Self {
            inum,
            name: [name[0], name[1], 0],
        }
    }

    pub fn parse(buf: &[u8]) -> Self {
        assert!(buf.len() >= DIR_ENTRY_SIZE);
        let entry: *const DirEntry = buf.as_ptr() as *const DirEntry;
        unsafe { entry.read_unaligned() }
    }

    pub fn serialize(&self) -> &[u8] {
        self.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.inum == NULL_INODE
    }

    pub fn matches(&self, name: [u8; 2]) -> bool {
        self.name[0] == name[0] && self.name[1] == name[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn entry_is_four_bytes() {
        assert_eq!(mem::size_of::<DirEntry>(), DIR_ENTRY_SIZE);
    }

    #[test]
    fn names_match_on_both_significant_characters() {
        let entry = DirEntry::new(3, *b"ab");
        assert!(entry.matches(*b"ab"));
        assert!(!entry.matches(*b"ac"));
        assert!(!entry.matches(*b"bb"));
    }

    #[test]
    fn null_inode_marks_an_empty_slot() {
        let mut entry = DirEntry::new(3, *b"ab");
        assert!(!entry.is_empty());
        entry.inum = NULL_INODE;
        assert!(entry.is_empty());
    }
}
