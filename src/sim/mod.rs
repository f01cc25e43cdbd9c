pub mod controller;
pub mod router;
pub mod surface;
