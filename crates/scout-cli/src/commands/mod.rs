pub mod dispatch;
pub mod history;
pub mod profile;
pub mod refresh;
pub mod review;
pub mod shared;
