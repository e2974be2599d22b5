mod scheduler;
mod sh;
mod volume;
