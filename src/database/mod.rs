pub mod connection;
pub mod operations;

pub use connection::create_ssl_connector;
pub use operations::{
    recent_gravity_means, recent_voltages, store_data_rev31, store_data_rev32, store_light,
};
