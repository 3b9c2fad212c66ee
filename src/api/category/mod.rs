pub mod category_api;
pub mod category_repository;
pub mod category_service;
