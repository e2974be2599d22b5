mod macros;

pub mod bounce;
pub mod capture;
pub mod effect;
pub mod error;
pub mod lightmap;
pub mod math;
pub mod output;
pub mod probe;
pub mod scheduler;
pub mod sh;
pub mod surface;
pub mod volume;
