pub mod app;
mod ar_view;
mod fonts;
mod pages;
