use crate::layout::{DIRECT_POINTERS, NODE_SIZE};

use zerocopy::{AsBytes, FromBytes};

#[repr(C)]
#[derive(AsBytes, FromBytes, Clone, Copy)]
/// On-disk inode record. This structure __must not exceed 256 bytes.__
pub struct Inode {
    /// The total size of the file in bytes. Never exceeds
    /// `blocks * BLOCK_SIZE`.
    pub size: u32,
    /// The number of data blocks backing the file, at most
    /// `DIRECT_POINTERS`.
    pub blocks: u32,
    /// Direct references into the data region for the blocks that belong
    /// to the file, in file order.
    pub pointers: [u32; DIRECT_POINTERS],
    /// Pads the record out to its fixed 256-byte table slot.
    reserved: [u32; 50],
}

impl Inode {
    pub fn zeroed() -> Self {
        Self {
            size: 0,
            blocks: 0,
            pointers: [0; DIRECT_POINTERS],
            reserved: [0; 50],
        }
    }

    /// Copies an inode record out of its table slot.
    pub fn parse(buf: &[u8]) -> Self {
        assert!(buf.len() >= NODE_SIZE);
        let node: *const Inode = buf.as_ptr() as *const Inode;
        unsafe { node.read_unaligned() }
    }

    pub fn serialize(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn record_fits_its_table_slot_exactly() {
        assert_eq!(mem::size_of::<Inode>(), NODE_SIZE);
    }

    #[test]
    fn zeroed_record_serializes_to_zero_bytes() {
        let node = Inode::zeroed();
        assert_eq!(node.serialize(), &[0u8; NODE_SIZE][..]);
    }

    #[test]
    fn parse_reads_fields_back_from_a_table_slot() {
        let mut node = Inode::zeroed();
        node.size = 5000;
        node.blocks = 2;
        node.pointers[0] = 1;
        node.pointers[1] = 2;

        let mut slot = [0u8; NODE_SIZE];
        slot.copy_from_slice(node.serialize());

        let read = Inode::parse(&slot);
        assert_eq!(read.size, 5000);
        assert_eq!(read.blocks, 2);
        assert_eq!(&read.pointers[..2], &[1, 2]);
    }
}
