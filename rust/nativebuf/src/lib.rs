//! Buffer types over unmanaged heap memory: a growable vector and a
//! fixed-size buffer that own raw allocations directly, plus non-owning
//! views over memory supplied by foreign code.
//!
//! Element types are restricted to plain data (`bytemuck::NoUninit +
//! bytemuck::AnyBitPattern`): the buffers operate purely on byte offsets and
//! never run element constructors or destructors, so a type carrying owning
//! pointers would leak or dangle. Within that restriction the types support
//! zero-copy reinterpretation between element types of different widths.

pub mod fixed;
pub mod vec;

pub use fixed::{FixedBuffer, NativeView};
pub use vec::NativeVec;

/// Marker bound for element types the buffers may hold: fixed layout, no
/// padding requirements on write, any bit pattern valid on read.
pub trait Element: bytemuck::NoUninit + bytemuck::AnyBitPattern {}

impl<T: bytemuck::NoUninit + bytemuck::AnyBitPattern> Element for T {}
