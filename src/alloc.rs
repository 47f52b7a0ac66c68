use std::collections::VecDeque;

#[derive(Debug, PartialEq)]
pub enum State {
    Free,
    Used,
}

/// Mutable view over the prefix of a bitmap block, one bit per slot.
/// Bits are scanned byte-ascending, most significant bit first, so slot
/// 0 is the top bit of byte 0. A set bit means the slot is occupied.
pub struct Bitmap<'a> {
    bits: &'a mut [u8],
    cap: usize,
}

impl<'a> Bitmap<'a> {
    pub fn new(bits: &'a mut [u8], cap: usize) -> Self {
        assert!(cap <= bits.len() * 8, "bitmap backing too small");
        Self { bits, cap }
    }

    #[allow(dead_code)]
    pub fn get(&self, slot: usize) -> State {
        assert!(slot < self.cap);
        if self.bits[slot / 8] & Self::mask(slot) == 0 {
            State::Free
        } else {
            State::Used
        }
    }

    /// Finds the first free slot, marks it used, and returns it. Returns
    /// `None` once every slot below the capacity is occupied.
    pub fn find_and_mark(&mut self) -> Option<usize> {
        for slot in 0..self.cap {
            let mask = Self::mask(slot);
            if self.bits[slot / 8] & mask == 0 {
                self.bits[slot / 8] |= mask;
                return Some(slot);
            }
        }
        None
    }

    pub fn clear(&mut self, slot: usize) {
        assert!(slot < self.cap);
        self.bits[slot / 8] &= !Self::mask(slot);
    }

    fn mask(slot: usize) -> u8 {
        0b1000_0000 >> (slot % 8)
    }
}

/// Hands out slots by combining a bitmap scan with a FIFO queue of
/// never-yet-allocated slot indices.
///
/// The two structures cover different ground: the queue tracks slots
/// above the high-water mark, while the bitmap finds holes reopened by
/// a free below it. A freed slot is never pushed back onto the queue;
/// the scan is the only way back to it.
pub struct Allocator {
    freelist: VecDeque<usize>,
    cap: usize,
}

impl Allocator {
    pub fn new(cap: usize) -> Self {
        Self {
            freelist: (0..cap).collect(),
            cap,
        }
    }

    /// Number of slots that have ever been handed out. Slots at or above
    /// this mark are untouched and still queued.
    pub fn high_water(&self) -> usize {
        self.cap - self.freelist.len()
    }

    pub fn allocate(&mut self, mut map: Bitmap) -> Option<usize> {
        let slot = map.find_and_mark()?;
        if slot < self.high_water() {
            // A hole left by an earlier free.
            return Some(slot);
        }
        let next = self.freelist.pop_front()?;
        // Dense fill: the scan lands exactly on the queued head.
        debug_assert_eq!(next, slot);
        Some(next)
    }

    pub fn free(&mut self, mut map: Bitmap, slot: usize) {
        map.clear(slot);
    }
}
