pub mod debug_controller;
