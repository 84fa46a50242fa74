pub mod chart;
pub mod clock;
pub mod constants;
pub mod error;
pub mod headway;
pub mod mapper;
pub mod memo;
pub mod mock;
pub mod model;
pub mod paths;
pub mod scrub;
pub mod viewport;
