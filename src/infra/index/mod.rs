pub mod memory_index;
