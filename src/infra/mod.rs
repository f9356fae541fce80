pub mod factory;
pub mod provisioner;
pub mod repositories;
