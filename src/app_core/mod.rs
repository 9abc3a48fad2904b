mod app;

pub use app::Podbox;
