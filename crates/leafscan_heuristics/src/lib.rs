pub mod analyzer;
pub mod hsv;
pub mod tensor;

pub use analyzer::{analyze, refine_plant_with_aspect};
pub use tensor::{ImageTensor, INPUT_SIZE};
