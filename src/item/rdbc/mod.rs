/// This module contains the RDBC reader implementation.
pub mod rdbc_reader;
