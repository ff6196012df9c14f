pub mod accrual;
pub mod fixed_point;
pub mod nav;
pub mod rate;

pub use accrual::*;
pub use fixed_point::*;
pub use nav::*;
pub use rate::*;
