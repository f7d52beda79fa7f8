//! Lock-free primitives shared between main and interrupt context.
//!
//! # Primitives
//!
//! - [`RingBuffer<N>`]: single-producer/single-consumer byte FIFO

mod ring_buffer;

pub use ring_buffer::RingBuffer;
