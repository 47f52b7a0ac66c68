//! An in-memory simulation of a minimal Unix-style on-disk layout: a
//! fixed 64 4k block disk holding one superblock, one inode bitmap, one
//! data bitmap, five inode blocks, and 56 blocks for user data, with a
//! single flat directory. A small request log (create/write, read,
//! delete) is replayed against the disk and the final block image is
//! emitted as a hex dump.

mod alloc;
mod dir;
mod node;
mod store;

pub mod cmd;
pub mod fs;
pub mod layout;

pub use crate::fs::{FlatFs, FsError};
