//! Test utilities for marshaling tests
//!
//! This module provides helper functions for writing handle translation and
//! buffer transfer tests. They are plain constructors, usable from any
//! crate's test suite.

use crate::objects::{Event, ResetType};
use crate::process::Process;
use core_types::{ObjectRef, ProcessId, VAddr};

/// Creates a throwaway kernel object for handle tests
pub fn make_object() -> ObjectRef {
    Event::create(ResetType::OneShot)
}

/// Creates a process with `bytes` mapped at `address`
pub fn process_with_block(pid: u32, address: VAddr, bytes: Vec<u8>) -> Process {
    let mut process = Process::new(ProcessId::new(pid));
    process
        .vm_mut()
        .map_block(address, bytes)
        .expect("test block must map");
    process
}

/// A page-sized byte payload filled with `fill`
pub fn filled_page(fill: u8) -> Vec<u8> {
    vec![fill; core_types::PAGE_SIZE]
}
