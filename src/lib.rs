#![no_std]
pub mod axis;
pub mod estimator;
pub mod foc;
pub mod limits;
pub mod loops;
pub mod lowpass;
pub mod math;
pub mod modulation;
pub mod pi;
pub mod plant;
pub mod trajectory;
