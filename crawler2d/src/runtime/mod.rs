mod creature;
mod driver;
mod gait;
mod input;
mod legs;
mod spine;

pub use creature::*;
pub use driver::*;
pub use gait::*;
pub use input::*;
pub use legs::*;
pub use spine::*;

#[cfg(test)]
mod input_tests;


#[cfg(test)]
mod gait_tests;

#[cfg(test)]
mod legs_tests;
