use crate::alloc::{Allocator, Bitmap};
use crate::dir::DirEntry;
use crate::layout::{
    BAD_BLOCK_INODE, BLOCK_SIZE, DATA_BLOCKS, DATA_BMP, DIRECT_POINTERS, DIR_ENTRIES,
    DIR_ENTRY_SIZE, INODE_BMP, INODE_COUNT, NULL_INODE, ROOT_INODE,
};
use crate::node::Inode;
use crate::store::BlockStore;

use log::debug;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FsError {
    /// Create on a name that already resolves to a live file.
    #[error("Already exists")]
    AlreadyExists,
    /// Read or delete on a name with no live directory entry.
    #[error("No such file")]
    NoSuchFile,
    /// Inode or data-block capacity exhausted. A create reporting this
    /// may still have produced a file, truncated to the blocks it
    /// actually obtained.
    #[error("No space")]
    NoSpace,
}

/// The whole simulated filesystem: the block store plus the allocators
/// that track its occupancy. One instance is a complete disk; callers
/// needing shared access must provide their own synchronization, the
/// structure itself is single-threaded.
pub struct FlatFs {
    store: BlockStore,
    inode_alloc: Allocator,
    data_alloc: Allocator,
    /// Directory slots share the allocator machinery, but their
    /// occupancy bits live here rather than in a reserved block; the
    /// entries themselves carry the on-disk liveness (inum != 0).
    dir_alloc: Allocator,
    dir_map: [u8; DIR_ENTRIES / 8],
}

impl FlatFs {
    /// Builds a freshly formatted disk: inodes 0 and 1 reserved as the
    /// "no inode" and "bad block" placeholders, inode 2 as the root
    /// directory with its single entry table in data slot 0. The
    /// directory owning slot 0 is what keeps pointer value 0 unreachable
    /// for user files.
    pub fn new() -> Self {
        let mut fs = FlatFs {
            store: BlockStore::new(),
            inode_alloc: Allocator::new(INODE_COUNT),
            data_alloc: Allocator::new(DATA_BLOCKS),
            dir_alloc: Allocator::new(DIR_ENTRIES),
            dir_map: [0; DIR_ENTRIES / 8],
        };

        let null = fs.alloc_inode().expect("fresh inode table");
        let bad = fs.alloc_inode().expect("fresh inode table");
        let root = fs.alloc_inode().expect("fresh inode table");
        debug_assert_eq!(
            (null, bad, root),
            (NULL_INODE as usize, BAD_BLOCK_INODE, ROOT_INODE)
        );

        let dir_block = fs.alloc_data().expect("fresh data region");
        let mut node = Inode::zeroed();
        node.size = (DIR_ENTRIES * DIR_ENTRY_SIZE) as u32;
        node.blocks = 1;
        node.pointers[0] = dir_block as u32;
        fs.put_inode(root, &node);
        fs
    }

    /// Creates a file and backs it with `ceil(size / BLOCK_SIZE)` data
    /// blocks, each filled with `fill` (the final block only up to the
    /// remaining byte count).
    ///
    /// Running out of data blocks, or out of direct pointers, does not
    /// roll the create back: the file keeps the blocks it obtained, its
    /// size shrinks to match, and `NoSpace` is reported.
    pub fn create(&mut self, name: [u8; 2], size: u32, fill: u8) -> Result<(), FsError> {
        if self.resolve(name).is_some() {
            return Err(FsError::AlreadyExists);
        }

        let inum = self.alloc_inode().ok_or(FsError::NoSpace)?;
        let slot = self
            .dir_alloc
            .allocate(Bitmap::new(&mut self.dir_map, DIR_ENTRIES))
            .ok_or(FsError::NoSpace)?;
        self.put_entry(slot, &DirEntry::new(inum as u8, name));
        debug!(
            "created \"{}\" as inode {} in directory slot {}",
            String::from_utf8_lossy(&name),
            inum,
            slot
        );

        self.write_file(inum, size, fill)
    }

    /// Returns at most `min(stored size, limit)` bytes of the named
    /// file, in pointer order.
    pub fn read(&self, name: [u8; 2], limit: u32) -> Result<Vec<u8>, FsError> {
        let (_, inum) = self.resolve(name).ok_or(FsError::NoSuchFile)?;
        let node = self.inode(inum);

        let wanted_blocks = (limit as usize + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let blocks = wanted_blocks.min(node.blocks as usize);
        let mut remaining = node.size.min(limit) as usize;

        let mut out = Vec::with_capacity(remaining);
        for i in 0..blocks {
            let take = remaining.min(BLOCK_SIZE);
            out.extend_from_slice(&self.store.data_block(node.pointers[i] as usize)[..take]);
            remaining -= take;
        }
        Ok(out)
    }

    /// Removes the named file: the directory entry's inode number goes
    /// back to the null sentinel (the name bytes stay behind in the
    /// block image), every backed data block is zeroed and its bitmap
    /// bit cleared, and the inode record is wiped.
    pub fn delete(&mut self, name: [u8; 2]) -> Result<(), FsError> {
        let (slot, inum) = self.resolve(name).ok_or(FsError::NoSuchFile)?;

        let mut entry = self.entry(slot);
        entry.inum = NULL_INODE;
        self.put_entry(slot, &entry);
        self.dir_alloc
            .free(Bitmap::new(&mut self.dir_map, DIR_ENTRIES), slot);

        self.inode_alloc.free(
            Bitmap::new(self.store.block_mut(INODE_BMP), INODE_COUNT),
            inum,
        );

        let node = self.inode(inum);
        for i in 0..node.blocks as usize {
            let pointer = node.pointers[i] as usize;
            for byte in self.store.data_block_mut(pointer).iter_mut() {
                *byte = 0;
            }
            self.data_alloc.free(
                Bitmap::new(self.store.block_mut(DATA_BMP), DATA_BLOCKS),
                pointer,
            );
        }

        self.store
            .inode_mut(inum)
            .copy_from_slice(Inode::zeroed().serialize());
        debug!(
            "deleted \"{}\" (inode {}, {} blocks)",
            String::from_utf8_lossy(&name),
            inum,
            node.blocks
        );
        Ok(())
    }

    /// The raw byte image of the whole disk.
    pub fn image(&self) -> &[u8] {
        self.store.image()
    }

    /// Scans the directory entries below the slot high-water mark for a
    /// live entry with a byte-exact name match.
    fn resolve(&self, name: [u8; 2]) -> Option<(usize, usize)> {
        for slot in 0..self.dir_alloc.high_water() {
            let entry = self.entry(slot);
            if !entry.is_empty() && entry.matches(name) {
                return Some((slot, entry.inum as usize));
            }
        }
        None
    }

    fn write_file(&mut self, inum: usize, size: u32, fill: u8) -> Result<(), FsError> {
        let mut node = Inode::zeroed();
        node.size = size;

        let wanted = (size as usize + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let mut exhausted = false;
        for i in 0..wanted {
            if i == DIRECT_POINTERS {
                exhausted = true;
                break;
            }
            match self.alloc_data() {
                Some(block) => node.pointers[i] = block as u32,
                None => {
                    exhausted = true;
                    break;
                }
            }
            node.blocks += 1;
        }
        if exhausted {
            // Keep whatever was backed; the logical size shrinks to match.
            node.size = node.blocks * BLOCK_SIZE as u32;
        }

        let mut remaining = node.size as usize;
        for i in 0..node.blocks as usize {
            let take = remaining.min(BLOCK_SIZE);
            let block = self.store.data_block_mut(node.pointers[i] as usize);
            for byte in block[..take].iter_mut() {
                *byte = fill;
            }
            remaining -= take;
        }

        self.put_inode(inum, &node);
        if exhausted {
            return Err(FsError::NoSpace);
        }
        Ok(())
    }

    fn alloc_inode(&mut self) -> Option<usize> {
        self.inode_alloc
            .allocate(Bitmap::new(self.store.block_mut(INODE_BMP), INODE_COUNT))
    }

    fn alloc_data(&mut self) -> Option<usize> {
        self.data_alloc
            .allocate(Bitmap::new(self.store.block_mut(DATA_BMP), DATA_BLOCKS))
    }

    fn inode(&self, inum: usize) -> Inode {
        Inode::parse(self.store.inode(inum))
    }

    fn put_inode(&mut self, inum: usize, node: &Inode) {
        self.store.inode_mut(inum).copy_from_slice(node.serialize());
    }

    fn dir_block(&self) -> usize {
        self.inode(ROOT_INODE).pointers[0] as usize
    }

    fn entry(&self, slot: usize) -> DirEntry {
        let block = self.store.data_block(self.dir_block());
        DirEntry::parse(&block[slot * DIR_ENTRY_SIZE..])
    }

    fn put_entry(&mut self, slot: usize, entry: &DirEntry) {
        let dir_block = self.dir_block();
        let block = self.store.data_block_mut(dir_block);
        block[slot * DIR_ENTRY_SIZE..(slot + 1) * DIR_ENTRY_SIZE].copy_from_slice(entry.serialize());
    }
}

impl Default for FlatFs {
    fn default() -> Self {
        Self::new()
    }
}
