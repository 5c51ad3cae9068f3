pub mod cell_list;
