//! Distribution functions used by the hypothesis tests: Student's t, chi-squared, F

pub mod special;
pub mod t;
pub mod chi;
pub mod f;

pub use t::t_two_tailed_p;
pub use chi::chi_sf;
pub use f::f_sf;
