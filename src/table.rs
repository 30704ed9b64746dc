use std::cmp::min;
use std::ops::Index;

use crate::utils::MyHash;

#[derive(Clone)]
struct Entry<T> {
    value: T,
    next: usize,
    occupied: bool,
}

/// Hash-consing arena.
///
/// Values live in a dense vector and are addressed by index; equal values are
/// stored once (see [`Table::put`]). Collisions are chained through `next`
/// links, starting from `buckets`. Index `0` is a sentinel meaning "none".
///
/// The backing vector grows on demand up to `2^bits` cells. Running past that
/// capacity is fatal.
pub struct Table<T> {
    data: Vec<Entry<T>>,
    capacity: usize,

    buckets: Vec<usize>,
    bitmask: u64,

    /// Index of the first *possibly* free (non-occupied) cell.
    min_free: usize,
    /// Number of occupied cells.
    real_size: usize,
}

impl<T> Table<T>
where
    T: Default,
{
    /// Create a new table with room for `2^bits` cells.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Storage bits should be in the range 0..=31");

        let capacity = 1 << bits;
        let data = vec![Entry {
            value: T::default(),
            next: 0,
            occupied: true, // sentry
        }];

        let buckets_bits = min(bits, 16);
        let buckets_size = 1 << buckets_bits;

        Self {
            data,
            capacity,
            buckets: vec![0; buckets_size],
            bitmask: (buckets_size - 1) as u64,
            min_free: 1,
            real_size: 0,
        }
    }
}

impl<T> Table<T> {
    /// Maximum number of cells, including the sentry.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    /// Number of cells ever touched (the high-water mark).
    pub fn size(&self) -> usize {
        self.data.len() - 1
    }
    /// Number of occupied cells.
    pub fn real_size(&self) -> usize {
        self.real_size
    }

    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        &self.data[index].value
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].occupied
    }

    pub fn next(&self, index: usize) -> usize {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].next
    }

    fn alloc(&mut self, value: T) -> usize {
        let index = (self.min_free..self.data.len())
            .find(|&i| !self.data[i].occupied)
            .unwrap_or(self.data.len());

        if index >= self.capacity {
            panic!("Storage is full");
        }

        let entry = Entry {
            value,
            next: 0,
            occupied: true,
        };
        if index == self.data.len() {
            self.data.push(entry);
        } else {
            self.data[index] = entry;
        }
        self.min_free = index + 1;
        self.real_size += 1;

        index
    }

    /// Drop every occupied cell for which `alive` returns `false`, unlinking
    /// it from its bucket chain. Returns the number of dropped cells.
    pub fn retain(&mut self, mut alive: impl FnMut(usize) -> bool) -> usize {
        let mut dropped = 0;
        for b in 0..self.buckets.len() {
            let mut prev = 0;
            let mut index = self.buckets[b];
            while index != 0 {
                let next = self.data[index].next;
                if alive(index) {
                    prev = index;
                } else {
                    if prev == 0 {
                        self.buckets[b] = next;
                    } else {
                        self.data[prev].next = next;
                    }
                    self.data[index].occupied = false;
                    self.data[index].next = 0;
                    self.min_free = min(self.min_free, index);
                    self.real_size -= 1;
                    dropped += 1;
                }
                index = next;
            }
        }
        dropped
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Return the index of `value`, inserting it if it is not present yet.
    pub fn put(&mut self, value: T) -> usize {
        let bucket_index = self.bucket_index(&value);
        let mut index = self.buckets[bucket_index];

        if index == 0 {
            let i = self.alloc(value);
            self.buckets[bucket_index] = i;
            return i;
        }

        loop {
            if &value == self.value(index) {
                return index;
            }

            let next = self.next(index);
            if next == 0 {
                let i = self.alloc(value);
                self.data[index].next = i;
                return i;
            }
            index = next;
        }
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}
