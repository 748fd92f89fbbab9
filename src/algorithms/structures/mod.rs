//! Contains small support data structures.

mod indexed_heap;
pub use self::indexed_heap::IndexedMinHeap;
