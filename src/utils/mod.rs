pub mod clock;
pub mod logging;
pub mod paths;
