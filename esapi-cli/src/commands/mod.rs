pub mod actions;
pub mod call;
pub mod describe;

pub use actions::run_actions;
pub use call::run_call;
pub use describe::run_describe;
