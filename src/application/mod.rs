// Application layer - Use cases over the realtime feeds
pub mod errors;
pub mod feed_repository;
pub mod feed_subscription;
pub mod greenhouse_service;
pub mod latest_selector;
pub mod rover_service;
