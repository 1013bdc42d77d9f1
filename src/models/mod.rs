pub mod dashboard;
pub mod price;
pub mod response;

pub use dashboard::*;
pub use price::*;
pub use response::*;
