mod basic_operations;
mod save_load;
