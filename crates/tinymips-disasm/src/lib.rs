pub mod model;

pub use model::{load_object, render, Image, Line};
