/// This module provides the flat-file item writer implementation.
pub mod flat_file;

/// This module provides the RDBC item reader implementation.
pub mod rdbc;
