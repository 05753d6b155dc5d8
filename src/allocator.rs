//! The byte-buffer allocator collaborator and its heap-backed reference implementation.

/// An opaque byte buffer handed out by an [`Allocator`].
///
/// Wraps a `Vec<u8>`; the core writes into it and later hands it back to
/// [`Allocator::release`] exactly once.
#[derive(Debug)]
pub struct Buffer(pub Vec<u8>);

impl Buffer {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

/// Byte-buffer allocator collaborator.
///
/// Shared (`Arc<dyn Allocator>`) across every column writer in a [`crate::write::PageWriteStore`],
/// so implementations must be `Send + Sync`.
pub trait Allocator: std::fmt::Debug + Send + Sync {
    /// Returns a zeroed buffer of `n_bytes` bytes.
    fn allocate(&self, n_bytes: usize) -> Buffer;

    /// Returns a buffer to the allocator. The reference implementation simply drops it; a
    /// pooling allocator would recycle the underlying storage here instead.
    fn release(&self, buffer: Buffer);
}

/// A heap-backed [`Allocator`]: `allocate` is a plain `vec![0; n]`, `release` drops the buffer.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl Allocator for HeapAllocator {
    fn allocate(&self, n_bytes: usize) -> Buffer {
        Buffer(vec![0u8; n_bytes])
    }

    fn release(&self, _buffer: Buffer) {}
}
