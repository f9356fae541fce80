pub mod connection_guard;
pub mod messages;
pub mod seeder;
pub mod tenant_service;
