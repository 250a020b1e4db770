pub mod protocol_controller;
pub mod request_controller;
