use crate::layout::{
    BLOCK_COUNT, BLOCK_SIZE, DATA_BLOCKS, DATA_START, INODE_COUNT, INODE_START, NODE_SIZE,
};

/// The simulated disk: a single contiguous buffer of 64 4k blocks owned
/// for the lifetime of the filesystem. Every other structure (bitmaps,
/// inode table, directory) is an overlay onto a slice of this buffer,
/// never separately allocated.
pub struct BlockStore {
    image: Box<[u8]>,
}

impl BlockStore {
    pub fn new() -> Self {
        Self {
            image: vec![0; BLOCK_COUNT * BLOCK_SIZE].into_boxed_slice(),
        }
    }

    pub fn block(&self, blocknr: usize) -> &[u8] {
        assert!(blocknr < BLOCK_COUNT, "block out of range");
        &self.image[blocknr * BLOCK_SIZE..(blocknr + 1) * BLOCK_SIZE]
    }

    pub fn block_mut(&mut self, blocknr: usize) -> &mut [u8] {
        assert!(blocknr < BLOCK_COUNT, "block out of range");
        &mut self.image[blocknr * BLOCK_SIZE..(blocknr + 1) * BLOCK_SIZE]
    }

    /// Borrows a data-region block by its slot index (0 is the first
    /// block after the inode table).
    pub fn data_block(&self, slot: usize) -> &[u8] {
        assert!(slot < DATA_BLOCKS, "data slot out of range");
        self.block(DATA_START + slot)
    }

    pub fn data_block_mut(&mut self, slot: usize) -> &mut [u8] {
        assert!(slot < DATA_BLOCKS, "data slot out of range");
        self.block_mut(DATA_START + slot)
    }

    /// Borrows the 256-byte record slot of an inode inside the table region.
    pub fn inode(&self, inum: usize) -> &[u8] {
        assert!(inum < INODE_COUNT, "inode out of range");
        let start = INODE_START * BLOCK_SIZE + inum * NODE_SIZE;
        &self.image[start..start + NODE_SIZE]
    }

    pub fn inode_mut(&mut self, inum: usize) -> &mut [u8] {
        assert!(inum < INODE_COUNT, "inode out of range");
        let start = INODE_START * BLOCK_SIZE + inum * NODE_SIZE;
        &mut self.image[start..start + NODE_SIZE]
    }

    /// The raw byte image of the whole disk, superblock through last
    /// data block.
    pub fn image(&self) -> &[u8] {
        &self.image
    }
}

impl Default for BlockStore {
    fn default() -> Self {
        Self::new()
    }
}
