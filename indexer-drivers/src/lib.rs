//! Hardware driver implementations
//!
//! Concrete implementations of the indexer-core port traits on top of
//! `embedded-hal` 1.0:
//!
//! - Break-beam receivers on a digital input
//! - Absolute carriage encoder (analog output)
//! - H-bridge motor drives (PWM plus direction pin)
//! - Pulse-width status light controller

#![no_std]
#![deny(unsafe_code)]

pub mod encoder;
pub mod indicator;
pub mod motor;
pub mod sensor;
