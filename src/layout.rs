//! Disk geometry. The layout is fixed at compile time: one superblock,
//! one inode bitmap, one data bitmap, five inode blocks, and 56 blocks
//! for user data.
//!
//! ```text
//! ==========================================================================
//! | SuperBlock | Bitmap (inodes) | Bitmap (data) | Inodes x5 | Data Region |
//! ==========================================================================
//! ```

pub const BLOCK_SIZE: usize = 4096;
pub const BLOCK_COUNT: usize = 64;
pub const NODE_SIZE: usize = 256;

/// Known block locations.
pub const SUPERBLOCK: usize = 0;
pub const INODE_BMP: usize = 1;
pub const DATA_BMP: usize = 2;
pub const INODE_START: usize = 3;
pub const INODE_BLOCKS: usize = 5;
pub const DATA_START: usize = 8;

pub const DATA_BLOCKS: usize = BLOCK_COUNT - DATA_START;
/// Assuming 256 bytes per inode a 4K block holds 16 inodes, for 80 total.
pub const INODE_COUNT: usize = INODE_BLOCKS * (BLOCK_SIZE / NODE_SIZE);

/// Direct data-block references per inode; no indirect blocks exist.
pub const DIRECT_POINTERS: usize = 12;

/// The directory block holds one 4-byte entry per possible inode.
pub const DIR_ENTRIES: usize = INODE_COUNT;
pub const DIR_ENTRY_SIZE: usize = 4;

/// Inode 0 doubles as the "slot empty" sentinel in directory entries,
/// so it can never name a real file.
pub const NULL_INODE: u8 = 0;
pub const BAD_BLOCK_INODE: usize = 1;
pub const ROOT_INODE: usize = 2;
