pub mod clock;
pub mod dropdown;
pub mod steps;
pub mod validation;
