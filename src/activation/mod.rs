pub mod activation;

pub use activation::Activator;
