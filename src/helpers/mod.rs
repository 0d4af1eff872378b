pub mod file_view;
