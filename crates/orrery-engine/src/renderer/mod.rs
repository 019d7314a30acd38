pub mod instance;
pub mod camera;
