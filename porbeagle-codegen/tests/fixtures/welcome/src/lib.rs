pub mod models;
pub mod views;

porbeagle::include_views!();
