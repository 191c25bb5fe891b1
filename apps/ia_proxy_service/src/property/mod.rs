pub mod property_controller;
pub mod property_request;
pub mod property_service;
