//! Outbound Rate Limiting
//!
//! A process-wide admission gate bounding request throughput towards the
//! catalog API. One [`RateLimiter`] is created at startup and shared by every
//! concurrent operation through an `Arc`.
//!
//! # Algorithm
//!
//! Sliding-window log: the limiter remembers the admission instants inside the
//! current window and admits a caller only while fewer than `max_requests`
//! fall inside it. Waiters queue on a FIFO mutex, so a caller never waits
//! longer than one window per caller admitted ahead of it.
//!
//! ```text
//!   acquire() ──► lock (FIFO) ──► prune expired ──► room? ──yes──► permit
//!                                      ▲                │
//!                                      └── sleep until ◄┘ no
//!                                          oldest + window
//! ```

pub mod config;
pub mod limiter;

pub use config::RateLimitConfig;
pub use limiter::{RateLimitPermit, RateLimiter};
